// openSMILE subprocess adapter
// Runs the SMILExtract command-line tool and parses its CSV output

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::features::extractor::{ExtractorError, FeatureExtractor};
use crate::features::table::{FeatureRecord, FeatureTable};

/// Known feature-set names and their config files relative to the openSMILE
/// config directory, matching the layout the openSMILE distribution ships.
const FEATURE_SETS: &[(&str, &str)] = &[
    ("ComParE_2016", "compare16/ComParE_2016.conf"),
    ("GeMAPSv01a", "gemaps/v01a/GeMAPSv01a.conf"),
    ("GeMAPSv01b", "gemaps/v01b/GeMAPSv01b.conf"),
    ("eGeMAPSv01a", "egemaps/v01a/eGeMAPSv01a.conf"),
    ("eGeMAPSv01b", "egemaps/v01b/eGeMAPSv01b.conf"),
    ("eGeMAPSv02", "egemaps/v02/eGeMAPSv02.conf"),
    ("emobase", "emobase/emobase.conf"),
];

/// Sink option selecting functionals output in the standard configs.
const FUNCTIONALS_SINK: &str = "-csvoutput";
/// Sink option selecting low-level descriptor output in the standard configs.
const DESCRIPTORS_SINK: &str = "-lldcsvoutput";

/// Feature extractor backed by the external `SMILExtract` tool.
///
/// Each call spawns one blocking subprocess: the tool reads the audio file,
/// writes a semicolon-separated CSV into a scratch temp file, and exits.
/// A non-zero exit fails the call with the tool's captured stderr.
pub struct SmileExtractor {
    executable: PathBuf,
    config: PathBuf,
}

impl SmileExtractor {
    /// Configure an extractor for one feature set. `feature_set` is either a
    /// known set name (resolved against `config_dir`) or a path to an
    /// existing `.conf` file, used as-is.
    pub fn new(
        executable: impl Into<PathBuf>,
        feature_set: &str,
        config_dir: &Path,
    ) -> Result<SmileExtractor, ExtractorError> {
        Ok(SmileExtractor {
            executable: executable.into(),
            config: resolve_feature_set(feature_set, config_dir)?,
        })
    }

    fn run_tool(&self, audio: &Path, sink: &str) -> Result<FeatureTable, ExtractorError> {
        let scratch = tempfile::Builder::new().suffix(".csv").tempfile()?;
        let instname = audio
            .file_stem()
            .unwrap_or_else(|| audio.as_os_str())
            .to_os_string();

        debug!(
            "running {} -C {} -I {} {} for {}",
            self.executable.display(),
            self.config.display(),
            audio.display(),
            sink,
            instname.to_string_lossy()
        );

        let output = Command::new(&self.executable)
            .arg("-C")
            .arg(&self.config)
            .arg("-I")
            .arg(audio)
            .arg(sink)
            .arg(scratch.path())
            .arg("-instname")
            .arg(&instname)
            .arg("-nologfile")
            .output()
            .map_err(|source| ExtractorError::Launch {
                command: self.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_smile_csv(&fs::read_to_string(scratch.path())?)
    }
}

impl FeatureExtractor for SmileExtractor {
    fn functionals(&self, audio: &Path) -> Result<FeatureRecord, ExtractorError> {
        let table = self.run_tool(audio, FUNCTIONALS_SINK)?;
        match table.record(0) {
            Some(record) if table.row_count() == 1 => Ok(record),
            _ => Err(ExtractorError::BadOutput(format!(
                "expected exactly one functionals row, got {}",
                table.row_count()
            ))),
        }
    }

    fn descriptors(&self, audio: &Path) -> Result<FeatureTable, ExtractorError> {
        self.run_tool(audio, DESCRIPTORS_SINK)
    }
}

/// Map a feature-set name to its openSMILE config file. A name carrying a
/// `.conf` extension is taken as a path to the config itself and must point
/// at an existing file.
fn resolve_feature_set(name: &str, config_dir: &Path) -> Result<PathBuf, ExtractorError> {
    let direct = Path::new(name);
    if direct.extension().is_some_and(|ext| ext == "conf") {
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }
        return Err(ExtractorError::MissingConfig(direct.to_path_buf()));
    }
    for (known, relative) in FEATURE_SETS {
        if *known == name {
            return Ok(config_dir.join(relative));
        }
    }
    Err(ExtractorError::UnknownFeatureSet(name.to_string()))
}

/// Parse the semicolon-separated CSV that the standard openSMILE configs
/// emit. The leading `name` column holds the instance name and is the only
/// non-numeric column; it is dropped. `frameTime` and the feature columns
/// are kept.
fn parse_smile_csv(text: &str) -> Result<FeatureTable, ExtractorError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| ExtractorError::BadOutput("empty extractor output".to_string()))?;
    let mut columns: Vec<&str> = header.split(';').map(str::trim).collect();
    let drop_name = columns.first() == Some(&"name");
    if drop_name {
        columns.remove(0);
    }

    let mut table = FeatureTable::new(columns.iter().map(|c| c.to_string()).collect());

    for line in lines {
        let mut fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if drop_name {
            fields.remove(0);
        }
        let values = fields
            .iter()
            .map(|field| field.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| {
                ExtractorError::BadOutput(format!("non-numeric field in row {:?}", line))
            })?;
        table
            .push_row(values)
            .map_err(|e| ExtractorError::BadOutput(e.to_string()))?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_known_feature_sets_resolve_under_config_dir() {
        let config = resolve_feature_set("eGeMAPSv02", Path::new("/opt/opensmile/config")).unwrap();
        assert_eq!(
            config,
            Path::new("/opt/opensmile/config/egemaps/v02/eGeMAPSv02.conf")
        );

        let config = resolve_feature_set("ComParE_2016", Path::new("config")).unwrap();
        assert_eq!(config, Path::new("config/compare16/ComParE_2016.conf"));
    }

    #[test]
    fn test_conf_path_used_directly() {
        let dir = TempDir::new().unwrap();
        let conf = dir.path().join("custom.conf");
        std::fs::write(&conf, "; custom config").unwrap();

        let resolved =
            resolve_feature_set(conf.to_str().unwrap(), Path::new("elsewhere")).unwrap();
        assert_eq!(resolved, conf);
    }

    #[test]
    fn test_unknown_feature_set_rejected() {
        let result = resolve_feature_set("NotAFeatureSet", Path::new("config"));
        assert!(matches!(result, Err(ExtractorError::UnknownFeatureSet(_))));
    }

    #[test]
    fn test_missing_conf_path_is_not_an_unknown_name() {
        let dir = TempDir::new().unwrap();
        let conf = dir.path().join("typo.conf");

        let err = resolve_feature_set(conf.to_str().unwrap(), Path::new("config")).unwrap_err();
        match err {
            ExtractorError::MissingConfig(path) => assert_eq!(path, conf),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_drops_name_column() {
        let table = parse_smile_csv("name;frameTime;loudness\n'clip';0;0.25\n").unwrap();
        assert_eq!(table.columns(), &["frameTime", "loudness"]);
        assert_eq!(table.row_count(), 1);
        let row: Vec<&[f64]> = table.rows().collect();
        assert_eq!(row[0], &[0.0, 0.25]);
    }

    #[test]
    fn test_parse_keeps_every_frame_row() {
        let text = "name;frameTime;F0\n'c';0;100\n'c';0.01;101\n'c';0.02;102\n";
        let table = parse_smile_csv(text).unwrap();
        assert_eq!(table.row_count(), 3);
        let rows: Vec<&[f64]> = table.rows().collect();
        assert_eq!(rows[2], &[0.02, 102.0]);
    }

    #[test]
    fn test_parse_rejects_non_numeric_features() {
        let result = parse_smile_csv("name;frameTime;F0\n'c';0;oops\n");
        assert!(matches!(result, Err(ExtractorError::BadOutput(_))));
    }

    #[test]
    fn test_parse_rejects_empty_output() {
        assert!(matches!(
            parse_smile_csv(""),
            Err(ExtractorError::BadOutput(_))
        ));
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let result = parse_smile_csv("name;frameTime;F0\n'c';0\n");
        assert!(matches!(result, Err(ExtractorError::BadOutput(_))));
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        fn write_stub(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("smilextract-stub");
            fs::write(&path, body).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_functionals_round_trip_through_stub_tool() {
            let dir = TempDir::new().unwrap();
            let conf = dir.path().join("stub.conf");
            fs::write(&conf, "; stub").unwrap();
            // Argument 6 is the scratch CSV path the sink option points at.
            let stub = write_stub(
                dir.path(),
                "#!/bin/sh\ncat > \"$6\" <<'EOF'\nname;frameTime;loudness\n'clip';0;0.5\nEOF\n",
            );

            let extractor =
                SmileExtractor::new(&stub, conf.to_str().unwrap(), dir.path()).unwrap();
            let record = extractor.functionals(Path::new("clip.wav")).unwrap();

            assert_eq!(record.columns(), &["frameTime", "loudness"]);
            assert_eq!(record.value("loudness"), Some(0.5));
        }

        #[test]
        fn test_tool_failure_carries_stderr() {
            let dir = TempDir::new().unwrap();
            let conf = dir.path().join("stub.conf");
            fs::write(&conf, "; stub").unwrap();
            let stub = write_stub(dir.path(), "#!/bin/sh\necho \"config invalid\" >&2\nexit 3\n");

            let extractor =
                SmileExtractor::new(&stub, conf.to_str().unwrap(), dir.path()).unwrap();
            let err = extractor.functionals(Path::new("clip.wav")).unwrap_err();

            match err {
                ExtractorError::Failed { stderr, .. } => assert_eq!(stderr, "config invalid"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn test_missing_executable_is_a_launch_error() {
            let dir = TempDir::new().unwrap();
            let conf = dir.path().join("stub.conf");
            fs::write(&conf, "; stub").unwrap();

            let extractor = SmileExtractor::new(
                dir.path().join("no-such-tool"),
                conf.to_str().unwrap(),
                dir.path(),
            )
            .unwrap();
            let err = extractor.functionals(Path::new("clip.wav")).unwrap_err();
            assert!(matches!(err, ExtractorError::Launch { .. }));
        }
    }
}
