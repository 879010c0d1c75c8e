//! Deployment path sanitization.
//!
//! Entry names coming out of an uploaded archive are untrusted. Two
//! independent checks guard against zip-slip: a virtual-root resolution
//! that collapses `.` and `..` segments, and a textual scan of the
//! normalized name for up-level tokens. The resolver only splits on `/`,
//! so the textual scan is what catches backslash-encoded traversal; the
//! two checks cover different encodings on purpose.

use tracing::warn;

/// Canonical deployment path: forward slashes, single leading `/`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SafePath(String);

impl SafePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SafePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry name the sanitizer refused to materialize.
///
/// Rejections are not fatal to the surrounding pass; callers collect
/// them and continue with the remaining entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub name: String,
    pub reason: RejectReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Resolving the name against the virtual root escaped the root.
    EscapesRoot,
    /// The normalized textual form still carries an up-level token.
    Traversal,
}

/// Segments of the fixed virtual root entry names are resolved against.
/// The root is purely virtual; resolution never touches the filesystem.
const VIRTUAL_ROOT: [&str; 2] = ["safe", "root"];

/// Decide whether an entry name is safe to deploy and compute its
/// canonical deployment path.
pub fn sanitize(name: &str) -> Result<SafePath, Rejected> {
    if !resolves_under_virtual_root(name) {
        warn!(entry = name, "dropping archive entry: resolves outside the extraction root");
        return Err(Rejected {
            name: name.to_owned(),
            reason: RejectReason::EscapesRoot,
        });
    }

    let normalized = name.replace('\\', "/");
    let mut textual = normalized.clone();
    if !textual.starts_with('/') {
        textual.insert(0, '/');
    }

    // Second, independent check on the textual form. Backslash-separated
    // names pass resolution as single segments and must be caught here.
    if textual.contains("/../") || name.contains("\\..\\") {
        warn!(entry = name, "dropping archive entry: traversal token in entry name");
        return Err(Rejected {
            name: name.to_owned(),
            reason: RejectReason::Traversal,
        });
    }

    // Canonical form: collapse empty and `.` segments of the normalized
    // name; any `..` still present here sits at the end of the name and
    // pops like the resolver would.
    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        warn!(entry = name, "dropping archive entry: name collapses to the root");
        return Err(Rejected {
            name: name.to_owned(),
            reason: RejectReason::Traversal,
        });
    }

    Ok(SafePath(format!("/{}", segments.join("/"))))
}

/// Resolve the name against the virtual root, collapsing `.` and `..`,
/// and require the result to be a strict descendant of the root.
fn resolves_under_virtual_root(name: &str) -> bool {
    let mut stack: Vec<&str> = VIRTUAL_ROOT.to_vec();
    if name.starts_with('/') {
        stack.clear();
    }
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }
    stack.len() > VIRTUAL_ROOT.len() && stack[..VIRTUAL_ROOT.len()] == VIRTUAL_ROOT
}
