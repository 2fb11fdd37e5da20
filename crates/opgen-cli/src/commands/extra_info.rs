// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generate the extra attribute maps from the operator compatibility table.

use crate::manifest::ExtraInfoSection;
use camino::Utf8PathBuf;
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use opgen_core::codegen::extra_info::{generate_extra_info, load_compat_document};
use std::fs;
use tracing::{info, instrument};

const DEFAULT_OP_COMPAT_YAML: &str = "paddle/phi/api/yaml/op_compat.yaml";
const DEFAULT_OPS_EXTRA_INFO: &str = "paddle/fluid/operators/ops_extra_info.cc";

/// Command-line arguments for `opgen extra-info`.
#[derive(Debug, Default, Args)]
pub struct ExtraInfoArgs {
    /// Operator compatibility table
    #[arg(long, alias = "op_compat_yaml_path")]
    pub op_compat_yaml_path: Option<Utf8PathBuf>,

    /// Output path of the generated source
    #[arg(long, alias = "ops_extra_info_path")]
    pub ops_extra_info_path: Option<Utf8PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraInfoOptions {
    pub op_compat_yaml: Utf8PathBuf,
    pub ops_extra_info: Utf8PathBuf,
}

impl ExtraInfoArgs {
    /// Merge flags with the config file: flag, then config, then default.
    #[must_use]
    pub fn resolve(self, config: &ExtraInfoSection) -> ExtraInfoOptions {
        ExtraInfoOptions {
            op_compat_yaml: self
                .op_compat_yaml_path
                .or_else(|| config.op_compat_yaml_path.clone())
                .unwrap_or_else(|| DEFAULT_OP_COMPAT_YAML.into()),
            ops_extra_info: self
                .ops_extra_info_path
                .or_else(|| config.ops_extra_info_path.clone())
                .unwrap_or_else(|| DEFAULT_OPS_EXTRA_INFO.into()),
        }
    }
}

/// Generate the `ExtraInfoUtils` source file.
#[instrument(skip_all, fields(table = %options.op_compat_yaml))]
pub fn run(options: &ExtraInfoOptions) -> Result<()> {
    info!("Generating extra attribute maps");

    let records = load_compat_document(&options.op_compat_yaml)
        .into_diagnostic()
        .wrap_err("Failed to load operator compatibility table")?;
    let source = generate_extra_info(&records)
        .into_diagnostic()
        .wrap_err("Failed to generate extra attribute maps")?;

    fs::write(&options.ops_extra_info, source)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to write '{}'", options.ops_extra_info))?;
    info!(path = %options.ops_extra_info, "Extra attribute maps generated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options_in(temp: &TempDir, table: &str) -> ExtraInfoOptions {
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        fs::write(root.join("op_compat.yaml"), table).unwrap();
        ExtraInfoOptions {
            op_compat_yaml: root.join("op_compat.yaml"),
            ops_extra_info: root.join("ops_extra_info.cc"),
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let options = ExtraInfoArgs::default().resolve(&ExtraInfoSection::default());
        assert_eq!(options.op_compat_yaml, DEFAULT_OP_COMPAT_YAML);
        assert_eq!(options.ops_extra_info, DEFAULT_OPS_EXTRA_INFO);
    }

    #[test]
    fn test_resolve_config_path() {
        let config = ExtraInfoSection {
            op_compat_yaml_path: Some("compat.yaml".into()),
            ops_extra_info_path: None,
        };
        let options = ExtraInfoArgs::default().resolve(&config);
        assert_eq!(options.op_compat_yaml, "compat.yaml");
    }

    #[test]
    fn test_run_writes_maps() {
        let temp = TempDir::new().unwrap();
        let options = options_in(
            &temp,
            "- op : softmax\n  backward : softmax_grad\n  extra :\n    attrs : [bool use_cudnn = false]\n",
        );
        run(&options).unwrap();
        let source = fs::read_to_string(&options.ops_extra_info).unwrap();
        assert!(source.contains("{\"softmax\", { {\"use_cudnn\", bool{false}} }}"));
        assert!(source.contains("{\"softmax_grad\", { {\"use_cudnn\", bool{false}} }}"));
        assert!(source.contains("ExtraAttrChecker<bool>(\"use_cudnn\", false)"));
    }

    #[test]
    fn test_malformed_attr_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let options = options_in(&temp, "- op : softmax\n  extra :\n    attrs : [use_cudnn]\n");
        assert!(run(&options).is_err());
        assert!(!options.ops_extra_info.exists());
    }
}
