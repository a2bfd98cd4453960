use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::{Error, Result};

pub const DEFAULT_PROGRAM: &str = "pydeface";

/// The result of running a defacer on one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaceResult {
    pub success: bool,
    pub output: String,
}

impl DefaceResult {
    pub fn success(output: &str) -> Self {
        Self {
            success: true,
            output: output.trim().to_string(),
        }
    }

    pub fn failure(output: &str) -> Self {
        Self {
            success: false,
            output: output.trim().to_string(),
        }
    }
}

/// Something that writes a defaced copy of `input` to `output`.
pub trait Defacer: Send + Sync {
    fn name(&self) -> &str;

    fn deface(&self, input: &Path, output: &Path) -> DefaceResult;
}

/// Runs `pydeface <input> --outfile <output>` as a subprocess.
#[derive(Debug, Clone)]
pub struct PyDeface {
    program: PathBuf,
}

impl PyDeface {
    /// Resolves `program` on `PATH` (or as a path) and fails if it is not executable.
    pub fn locate(program: &str) -> Result<Self> {
        let search_path = std::env::var_os("PATH").unwrap_or_default();
        let program = locate_in(program, &search_path).ok_or_else(|| Error::DefacerNotFound {
            program: program.to_string(),
        })?;
        Ok(Self::from_path(program))
    }

    pub fn from_path<P>(program: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            program: program.as_ref().to_owned(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Defacer for PyDeface {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_PROGRAM)
    }

    fn deface(&self, input: &Path, output: &Path) -> DefaceResult {
        tracing::debug!(
            "Running {} {} --outfile {}",
            self.program.display(),
            input.display(),
            output.display()
        );
        let result = Command::new(&self.program)
            .arg(input)
            .arg("--outfile")
            .arg(output)
            .output();

        match result {
            Ok(out) => {
                let mut text = String::new();
                text.push_str(&String::from_utf8_lossy(&out.stdout));
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                if out.status.success() {
                    DefaceResult::success(&text)
                } else if text.trim().is_empty() {
                    DefaceResult::failure(&format!(
                        "{} exited with {}",
                        self.program.display(),
                        out.status
                    ))
                } else {
                    DefaceResult::failure(&text)
                }
            }
            Err(e) => DefaceResult::failure(&format!(
                "Failed to run {}: {e}",
                self.program.display()
            )),
        }
    }
}

/// Finds an executable named `program` in `search_path`.
///
/// Values containing a path separator are checked directly instead of being
/// searched for.
pub fn locate_in(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_owned());
    }

    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    /// Writes an executable shell script into `dir`.
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to set permissions");
        path
    }

    #[test]
    fn test_locate_in_search_path() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let script = write_script(second.path(), "pydeface", "exit 0");

        let search_path =
            std::env::join_paths([first.path(), second.path()]).expect("Failed to join paths");
        assert_eq!(locate_in("pydeface", &search_path), Some(script));
        assert_eq!(locate_in("not-there", &search_path), None);
    }

    #[test]
    fn test_locate_in_skips_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pydeface"), "not a program").unwrap();

        assert_eq!(locate_in("pydeface", dir.path().as_os_str()), None);
    }

    #[test]
    fn test_locate_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "my-defacer", "exit 0");

        let found = locate_in(script.to_str().unwrap(), OsStr::new(""));
        assert_eq!(found, Some(script));
    }

    #[test]
    fn test_locate_missing_program() {
        let err = PyDeface::locate("surely-no-such-defacer-binary").unwrap_err();
        assert!(matches!(err, Error::DefacerNotFound { .. }));
    }

    /// `sh <script> --outfile <output>`: the script stands in as the input image,
    /// so nothing freshly written has to be executed.
    fn run_with_sh(dir: &Path, body: &str) -> (DefaceResult, PathBuf) {
        let script = dir.join("fake_pydeface.sh");
        fs::write(&script, body).unwrap();
        let output = dir.join("out.nii.gz");
        let result = PyDeface::from_path("/bin/sh").deface(&script, &output);
        (result, output)
    }

    #[test]
    fn test_deface_success_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let (result, output) = run_with_sh(
            dir.path(),
            r#"echo "  writing $2  "; echo image > "$2""#,
        );

        assert!(result.success);
        assert_eq!(result.output, format!("writing {}", output.display()));
        assert_eq!(fs::read_to_string(&output).unwrap(), "image\n");
    }

    #[test]
    fn test_deface_failure_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let (result, output) = run_with_sh(dir.path(), "echo 'bad header' >&2; exit 3");

        assert_eq!(result, DefaceResult::failure("bad header"));
        assert!(!output.exists());
    }

    #[test]
    fn test_deface_silent_failure_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let (result, _) = run_with_sh(dir.path(), "exit 1");

        assert!(!result.success);
        assert!(result.output.contains("exited with"), "{}", result.output);
    }

    #[test]
    fn test_deface_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = PyDeface::from_path(dir.path().join("missing"))
            .deface(&dir.path().join("in.nii.gz"), &dir.path().join("out.nii.gz"));

        assert!(!result.success);
        assert!(result.output.starts_with("Failed to run"), "{}", result.output);
    }
}
