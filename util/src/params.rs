//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::Path;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (AUTOPILOT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "params" directory under the software
/// root.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError> 
where
    P: DeserializeOwned
{
    // Get the params dir
    let mut path = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(param_file_path);

    load_from(path)
}

/// Load a parameter file from an explicit path.
pub fn load_from<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>
{
    // Load the file into a string
    let params_str = read_to_string(path)
        .map_err(LoadError::FileLoadError)?;

    from_str(&params_str)
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestParams {
        period_s: f64,
        name: String,
        limit_m: Option<f64>
    }

    #[test]
    fn test_from_str() {
        let p: TestParams = from_str("period_s = 0.02\nname = \"align\"\n")
            .unwrap();
        
        assert_eq!(p, TestParams {
            period_s: 0.02,
            name: String::from("align"),
            limit_m: None
        });

        let err = from_str::<TestParams>("period_s = \"fast\"\n");
        assert!(matches!(err, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "period_s = 0.1\nname = \"test\"\nlimit_m = 2.5").unwrap();

        let p: TestParams = load_from(&path).unwrap();
        assert_eq!(p.limit_m, Some(2.5));

        let missing = load_from::<TestParams, _>(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(LoadError::FileLoadError(_))));
    }
}
