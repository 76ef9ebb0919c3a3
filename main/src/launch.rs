use std::path::Path;
use std::process::Command;

/// Installs the declared dependencies with the configured installer. Any
/// failure is fatal for the launcher: the server must not start on top of a
/// half-installed environment, and there is no retry.
pub fn install_dependencies(installer: &str, manifest: &str) -> Result<(), String> {
    if !Path::new(manifest).exists() {
        return Err(format!("Dependency manifest {} does not exist", manifest));
    }

    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{} {}", installer, manifest))
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) =>
            Err(format!("Dependency installation failed with {}", status)),
        Err(e) =>
            Err(format!("Cannot run the dependency installer: {}", e)),
    }
}

/// Spawns the serving process in the foreground and blocks until it exits.
/// A configured server command is run verbatim through the shell, otherwise
/// the native daemon is started with the same rc file.
pub fn run_server(server: Option<&str>, rc_path: &str) -> Result<i32, String> {
    let status = match server {
        Some(command) => Command::new("sh")
            .arg("-c")
            .arg(command.to_string())
            .status(),
        None => Command::new("slotinsightd")
            .arg(format!("--slotinsightrc={}", rc_path))
            .status(),
    };

    match status {
        Ok(status) => Ok(status.code().unwrap_or(1)),
        Err(e) => Err(format!("Cannot start the server: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn manifest_with(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let path = path.display().to_string();
        (dir, path)
    }

    #[test]
    fn test_successful_install() {
        let (_dir, manifest) = manifest_with("pandas\n");
        assert_eq!(Ok(()), install_dependencies("true #", &manifest));
    }

    #[test]
    fn test_failing_installer_is_reported() {
        let (_dir, manifest) = manifest_with("pandas\n");
        let result = install_dependencies("exit 3 #", &manifest);
        assert!(result.unwrap_err().contains("failed"));
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let result = install_dependencies("true #", "/no/such/requirements.txt");
        assert!(result.unwrap_err().contains("does not exist"));
    }

    #[test]
    fn test_server_exit_code_is_propagated() {
        assert_eq!(Ok(0), run_server(Some("true"), "unused"));
        assert_eq!(Ok(7), run_server(Some("exit 7"), "unused"));
    }
}
