//! The standard protoc-plugin parameter string (`spec.md` §6, "CLI"):
//! comma-separated `key` or `key=value` pairs, e.g.
//! `"paths=source_relative,format=yaml"`. Hand-rolled — there is no argv
//! surface for a protoc plugin, just this one string, so pulling in `clap`
//! would buy nothing.

use crate::error::DriverError;

/// Output path style. `SourceRelative` places each generated file next to
/// its `.proto` source; `Import` (the default) mirrors the proto's package
/// path under the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathsMode {
    #[default]
    Import,
    SourceRelative,
}

/// The OpenAPI emitter's output format. Ignored by the other three emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Parsed plugin options, shared by every `sebuf-gen-*` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PluginOptions {
    pub paths: PathsMode,
    pub format: OutputFormat,
}

/// Parse the plugin parameter string. An empty or absent parameter yields
/// `PluginOptions::default()`. Any option this crate doesn't recognize is a
/// hard error — the spec requires unknown options to surface, not silently
/// pass through.
pub fn parse_parameter(parameter: Option<&str>) -> Result<PluginOptions, DriverError> {
    let mut options = PluginOptions::default();
    let Some(parameter) = parameter else {
        return Ok(options);
    };

    for entry in parameter.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let mut parts = entry.splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        let value = parts.next();

        match (key, value) {
            ("paths", Some("source_relative")) => options.paths = PathsMode::SourceRelative,
            ("paths", Some("import")) => options.paths = PathsMode::Import,
            ("format", Some("yaml")) => options.format = OutputFormat::Yaml,
            ("format", Some("json")) => options.format = OutputFormat::Json,
            _ => return Err(DriverError::UnknownOption(entry.to_string())),
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parameter_is_default() {
        assert_eq!(parse_parameter(None).unwrap(), PluginOptions::default());
    }

    #[test]
    fn parses_paths_and_format() {
        let options = parse_parameter(Some("paths=source_relative,format=json")).unwrap();
        assert_eq!(options.paths, PathsMode::SourceRelative);
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_option_errors() {
        assert!(parse_parameter(Some("bogus=1")).is_err());
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let options = parse_parameter(Some(" paths=source_relative , format=yaml ")).unwrap();
        assert_eq!(options.paths, PathsMode::SourceRelative);
        assert_eq!(options.format, OutputFormat::Yaml);
    }
}
