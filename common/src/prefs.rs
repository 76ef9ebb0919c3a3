use dirs::home_dir;
use std::fs::{create_dir_all, File};
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

pub static CREDENTIALS_FILE: &'static str = "credentials.ini";

// Written once to suppress the interactive first-run prompt of the serving
// framework. Existing files are never touched.
static CREDENTIALS_CONTENT: &'static str = "[general]\nemail=\n";

pub fn config_dir() -> PathBuf {
    home_dir().expect("Cannot find the home directory").join(".slotinsight")
}

pub fn ensure_preference_file(dir: &Path) -> io::Result<PathBuf> {
    create_dir_all(dir)?;
    let path = dir.join(CREDENTIALS_FILE);
    if !path.exists() {
        let mut file = File::create(&path)?;
        file.write_all(CREDENTIALS_CONTENT.as_bytes())?;
    }
    Ok(path)
}

pub fn ensure_log_config(dir: &Path, binary: &str) -> io::Result<PathBuf> {
    create_dir_all(dir)?;
    let path = dir.join(format!("{}-log4rs.yaml", binary));
    if !path.exists() {
        let log_path = dir.join(format!("{}.log", binary));
        let contents = format!(
"appenders:
  main:
    kind: file
    path: \"{}\"
    encoder:
      pattern: \"{{d}} {{l}} {{t}} - {{m}}{{n}}\"
root:
  level: info
  appenders:
    - main
", log_path.display());
        let mut file = File::create(&path)?;
        file.write_all(contents.as_bytes())?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::read_to_string;
    use tempfile::tempdir;

    #[test]
    fn test_preference_file_is_created_once() {
        let dir = tempdir().unwrap();
        let dir = dir.path().join("conf");

        let path = ensure_preference_file(&dir).unwrap();
        assert_eq!("[general]\nemail=\n", read_to_string(&path).unwrap());

        let again = ensure_preference_file(&dir).unwrap();
        assert_eq!(path, again);
        assert_eq!("[general]\nemail=\n", read_to_string(&path).unwrap());
    }

    #[test]
    fn test_existing_preference_file_is_not_overwritten() {
        let dir = tempdir().unwrap();

        let path = dir.path().join(CREDENTIALS_FILE);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"[general]\nemail=operator@example.com\n").unwrap();
        drop(file);

        ensure_preference_file(dir.path()).unwrap();
        assert_eq!("[general]\nemail=operator@example.com\n",
                   read_to_string(&path).unwrap());
    }

    #[test]
    fn test_log_config_is_created_once() {
        let dir = tempdir().unwrap();

        let path = ensure_log_config(dir.path(), "slotinsightd").unwrap();
        let contents = read_to_string(&path).unwrap();
        assert!(contents.contains("slotinsightd.log"));
        assert!(contents.contains("level: info"));

        let marker = "# edited by the operator\n";
        let mut file = File::create(&path).unwrap();
        file.write_all(marker.as_bytes()).unwrap();
        drop(file);

        ensure_log_config(dir.path(), "slotinsightd").unwrap();
        assert_eq!(marker, read_to_string(&path).unwrap());
    }
}
