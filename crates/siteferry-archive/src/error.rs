use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted or not a zip file")]
    Corrupted,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
