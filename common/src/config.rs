use ini::Ini;
use crate::dataset::Dataset;
use crate::log_and_panic;

pub struct Configuration {
    pub server: Option<String>,
    pub installer: String,
    pub manifest: String,
    pub socket_root: String,
    pub timeout: u64,
    pub datasets: Vec<Dataset>,
}

impl Configuration {
    /// Built-in defaults, used by the launcher when no rc file exists.
    pub fn defaults() -> Self {
        Configuration {
            server: None,
            installer: DEFAULT_INSTALLER.to_string(),
            manifest: DEFAULT_MANIFEST.to_string(),
            socket_root: DEFAULT_SOCKET_ROOT.to_string(),
            timeout: DEFAULT_TIMEOUT_IN_SECONDS,
            datasets: Vec::new(),
        }
    }

    /// The daemon and the client need at least one dataset section; the
    /// launcher does not, which is why this is not checked in `read_config`.
    pub fn require_datasets(&self) {
        if self.datasets.is_empty() {
            log_and_panic("At least one dataset should be configured");
        }
    }

    pub fn default_dataset(&self) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.default)
    }

    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

pub fn read_config(rc_path: &str) -> Configuration {
    let conf = Ini::load_from_file(rc_path).unwrap();

    let app = conf.section(Some("App".to_owned()));
    let socket_root = app.and_then(|app| {
        app.get("socket-root-path").map(|s| s.to_string())
    }).unwrap_or_else(|| DEFAULT_SOCKET_ROOT.to_string());

    let launcher = conf.section(Some("Launcher".to_owned()));
    let server = launcher.and_then(|section| {
        section.get("server").map(|s| s.to_string())
    });

    let installer = launcher.and_then(|section| {
        section.get("installer").map(|s| s.to_string())
    }).unwrap_or_else(|| DEFAULT_INSTALLER.to_string());

    let manifest = launcher.and_then(|section| {
        section.get("manifest").map(|s| s.to_string())
    }).unwrap_or_else(|| DEFAULT_MANIFEST.to_string());

    let timeout = conf.section(Some("Client")).and_then(|section| {
        section.get("timeout").map(|s| {
            let res: u64 = s.parse()
                .expect("Invalid timeout value in configuration");
            res
        })
    }).unwrap_or(DEFAULT_TIMEOUT_IN_SECONDS);

    let mut datasets: Vec<Dataset> = Vec::new();

    for (section_name, section) in conf.iter() {
        if section_name.is_some() &&
                *section_name != Some("App".to_string()) &&
                *section_name != Some("Client".to_string()) &&
                *section_name != Some("Launcher".to_string()) {
            let label = section_name.clone().unwrap();
            let path  = section.get("path").map(|s| s.to_string())
                .expect("path is missing in a dataset section");

            let default = section.get("default").map(|p| {
                let default: bool = p.parse()
                    .expect("Invalid bool value in configuration");
                default
            }).unwrap_or(false);

            datasets.push(Dataset {
                label,
                path,
                default,
            })
        }
    }

    let default_datasets = datasets.iter()
        .fold(0, |z, y| if y.default { z + 1 } else { z });

    if default_datasets > 1 {
        panic!("At most one dataset can be set to default");
    }

    Configuration {
        server,
        installer,
        manifest,
        socket_root,
        timeout,
        datasets,
    }
}

const DEFAULT_TIMEOUT_IN_SECONDS: u64 = 30;
const DEFAULT_SOCKET_ROOT: &'static str = "/tmp";
const DEFAULT_INSTALLER: &'static str = "python3 -m pip install -r";
const DEFAULT_MANIFEST: &'static str = "requirements.txt";

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_rc(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("slotinsightrc");
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let path = path.display().to_string();
        (dir, path)
    }

    #[test]
    fn test_read_config_with_datasets() {
        let (_dir, path) = write_rc("
[App]
socket-root-path=/var/run/slotinsight

[Client]
timeout=5

[Launcher]
installer=
server=streamlit run app.py --browser.gatherUsageStats=false --server.headless=false

[daily]
path=/data/daily.xlsx
default=true

[archive]
path=/data/archive.xlsx
");
        let conf = read_config(&path);
        assert_eq!("/var/run/slotinsight", conf.socket_root);
        assert_eq!(5, conf.timeout);
        assert_eq!("", conf.installer);
        assert!(conf.server.as_ref().unwrap().starts_with("streamlit run"));
        assert_eq!(2, conf.datasets.len());
        assert_eq!("daily", conf.default_dataset().unwrap().label);
        assert_eq!("/data/archive.xlsx", conf.dataset("archive").unwrap().path);
    }

    #[test]
    fn test_read_config_defaults() {
        let (_dir, path) = write_rc("
[daily]
path=/data/daily.xlsx
");
        let conf = read_config(&path);
        assert_eq!("/tmp", conf.socket_root);
        assert_eq!(30, conf.timeout);
        assert_eq!("python3 -m pip install -r", conf.installer);
        assert_eq!("requirements.txt", conf.manifest);
        assert!(conf.server.is_none());
        assert!(conf.default_dataset().is_none());
    }

    #[test]
    #[should_panic(expected = "At most one dataset")]
    fn test_two_default_datasets_is_fatal() {
        let (_dir, path) = write_rc("
[a]
path=/data/a.xlsx
default=true

[b]
path=/data/b.xlsx
default=true
");
        read_config(&path);
    }
}
