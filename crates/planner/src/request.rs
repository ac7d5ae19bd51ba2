//! Loading deployment requests from files or stdin.

use std::fs;
use std::io::Read;
use std::path::Path;

use api_types::DeploymentRequest;
use error_stack::Report;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Path that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("failed to read request from {source_name}")]
    ReadFailed { source_name: String },
    #[error("failed to parse {format} request")]
    ParseFailed { format: RequestFormat },
    #[error("unsupported request file extension `{extension}`")]
    UnsupportedFormat { extension: String },
}

/// Encoding of a request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RequestFormat {
    #[display("JSON")]
    Json,
    #[display("YAML")]
    Yaml,
}

impl RequestFormat {
    /// Picks the format from the file extension. Files without an extension
    /// and stdin are read as YAML, which also accepts JSON documents.
    pub fn from_path(path: &Path) -> Result<Self, Report<RequestError>> {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Ok(RequestFormat::Yaml);
        };
        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(RequestFormat::Json),
            "yaml" | "yml" => Ok(RequestFormat::Yaml),
            _ => Err(Report::new(RequestError::UnsupportedFormat {
                extension: extension.to_string(),
            })),
        }
    }
}

/// Reads a request from `path`, or from stdin when `path` is `-`.
pub fn load(path: &Path) -> Result<DeploymentRequest, Report<RequestError>> {
    load_document(path)
}

/// Reads any request-shaped document from `path`, or from stdin when `path`
/// is `-`.
pub fn load_document<T>(path: &Path) -> Result<T, Report<RequestError>>
where
    T: DeserializeOwned + Default,
{
    if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .change_context(RequestError::ReadFailed {
                source_name: "stdin".to_string(),
            })?;
        return parse_document(&content, RequestFormat::Yaml);
    }

    let format = RequestFormat::from_path(path)?;
    let content = fs::read_to_string(path).change_context_lazy(|| RequestError::ReadFailed {
        source_name: path.display().to_string(),
    })?;
    debug!(path = %path.display(), %format, "loaded request file");
    parse_document(&content, format)
}

pub fn parse(content: &str, format: RequestFormat) -> Result<DeploymentRequest, Report<RequestError>> {
    parse_document(content, format)
}

pub fn parse_document<T>(content: &str, format: RequestFormat) -> Result<T, Report<RequestError>>
where
    T: DeserializeOwned + Default,
{
    match format {
        RequestFormat::Json => {
            serde_json::from_str(content).change_context(RequestError::ParseFailed { format })
        }
        RequestFormat::Yaml => {
            // An empty document is an empty request, not a parse error.
            if content.trim().is_empty() {
                return Ok(T::default());
            }
            serde_yaml::from_str(content).change_context(RequestError::ParseFailed { format })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use api_types::DeploymentMode;
    use api_types::GpuType;
    use api_types::ModelParams;
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            RequestFormat::from_path(Path::new("req.json")).unwrap(),
            RequestFormat::Json
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("req.YML")).unwrap(),
            RequestFormat::Yaml
        );
        assert_eq!(
            RequestFormat::from_path(Path::new("request")).unwrap(),
            RequestFormat::Yaml
        );
        let err = RequestFormat::from_path(Path::new("req.toml")).unwrap_err();
        assert!(matches!(
            err.current_context(),
            RequestError::UnsupportedFormat { extension } if extension == "toml"
        ));
    }

    #[test]
    fn parses_yaml_with_form_aliases() {
        let request = parse(
            "serviceName: chat\nmodelParams: 13B\nbatchSize: \"4\"\nmode: manual\ngpuType: l40s\ngpuCount: 12\n",
            RequestFormat::Yaml,
        )
        .unwrap();

        assert_eq!(request.service_name, "chat");
        assert_eq!(request.model_params, Some(ModelParams::P13B));
        assert_eq!(request.batch_size, 4);
        assert_eq!(request.mode, DeploymentMode::Manual);
        assert_eq!(request.manual_allocation().gpu_type(), GpuType::L40S);
        assert_eq!(request.manual_allocation().gpu_count(), 8);
    }

    #[test]
    fn parses_json() {
        let request = parse(
            r#"{"serviceName":"svc","sequenceLength":1024,"temperature":"0.2"}"#,
            RequestFormat::Json,
        )
        .unwrap();
        assert_eq!(request.service_name, "svc");
        assert_eq!(request.sequence_length, 1024);
        assert_eq!(request.temperature, 0.2);
    }

    #[test]
    fn empty_yaml_is_default_request() {
        assert_eq!(
            parse("   \n", RequestFormat::Yaml).unwrap(),
            DeploymentRequest::default()
        );
    }

    #[test]
    fn malformed_json_reports_format() {
        let err = parse("{not json", RequestFormat::Json).unwrap_err();
        assert!(matches!(
            err.current_context(),
            RequestError::ParseFailed {
                format: RequestFormat::Json
            }
        ));
        assert_eq!(err.current_context().to_string(), "failed to parse JSON request");
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"serviceName":"from-file","gpuType":"A100"}}"#).unwrap();

        let request = load(file.path()).unwrap();
        assert_eq!(request.service_name, "from-file");
        assert_eq!(request.gpu_type, GpuType::A100);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(
            err.current_context(),
            RequestError::ReadFailed { .. }
        ));
    }
}
