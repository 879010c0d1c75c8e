#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive contains no valid or safe files")]
    EmptyArchive,

    #[error(transparent)]
    Archive(#[from] siteferry_archive::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
