// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generate eager and static tensor operants.
//!
//! All inputs are read and all four files are rendered in memory before the
//! first output is opened, so a bad schema never leaves partial output. A
//! write failure part-way through leaves the earlier files written.

use crate::manifest::OperantsSection;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use opgen_core::codegen::operants::{
    GenerationConfig, OperantsFile, OperantsOutput, generate_operants,
};
use opgen_core::prim_list::PrimList;
use opgen_core::schema::load_op_documents;
use std::fs;
use tracing::{debug, error, info, instrument, warn};

const DEFAULT_API_YAML: &str = "paddle/phi/api/yaml/ops.yaml";
const DEFAULT_API_PRIM_YAML: &str = "paddle/fluid/prim/api/auto_code_generated/api.yaml";
const DEFAULT_EAGER_HEADER: &str = "paddle/fluid/prim/utils/eager/eager_tensor_operants.h.tmp";
const DEFAULT_EAGER_SOURCE: &str = "paddle/fluid/prim/utils/eager/eager_tensor_operants.cc.tmp";
const DEFAULT_STATIC_HEADER: &str = "paddle/fluid/prim/utils/static/static_tensor_operants.h.tmp";
const DEFAULT_STATIC_SOURCE: &str = "paddle/fluid/prim/utils/static/static_tensor_operants.cc.tmp";

/// Command-line arguments for `opgen operants`.
#[derive(Debug, Default, Args)]
pub struct OperantsArgs {
    /// Operator schema files, concatenated in order [default: paddle/phi/api/yaml/ops.yaml]
    #[arg(long, num_args = 1.., alias = "api_yaml_path")]
    pub api_yaml_path: Vec<Utf8PathBuf>,

    /// Primitive operator list file
    #[arg(long, alias = "api_prim_yaml_path")]
    pub api_prim_yaml_path: Option<Utf8PathBuf>,

    /// Output path of the eager header
    #[arg(long, alias = "eager_tensor_operants_header_path")]
    pub eager_tensor_operants_header_path: Option<Utf8PathBuf>,

    /// Output path of the eager source
    #[arg(long, alias = "eager_tensor_operants_source_path")]
    pub eager_tensor_operants_source_path: Option<Utf8PathBuf>,

    /// Output path of the static header
    #[arg(long, alias = "static_tensor_operants_header_path")]
    pub static_tensor_operants_header_path: Option<Utf8PathBuf>,

    /// Output path of the static source
    #[arg(long, alias = "static_tensor_operants_source_path")]
    pub static_tensor_operants_source_path: Option<Utf8PathBuf>,

    /// Emit every operator on the prim list instead of only add, subtract,
    /// multiply and divide
    #[arg(long, overrides_with = "no_honor_prim_list")]
    pub honor_prim_list: bool,

    /// Emit only add, subtract, multiply and divide even if the config file
    /// sets `honor_prim_list`
    #[arg(long, overrides_with = "honor_prim_list")]
    pub no_honor_prim_list: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperantsOptions {
    pub api_yaml: Vec<Utf8PathBuf>,
    pub api_prim_yaml: Utf8PathBuf,
    pub eager_header: Utf8PathBuf,
    pub eager_source: Utf8PathBuf,
    pub static_header: Utf8PathBuf,
    pub static_source: Utf8PathBuf,
    pub honor_prim_list: bool,
}

fn pick(flag: Option<Utf8PathBuf>, config: Option<&Utf8PathBuf>, default: &str) -> Utf8PathBuf {
    flag.or_else(|| config.cloned())
        .unwrap_or_else(|| Utf8PathBuf::from(default))
}

impl OperantsArgs {
    /// Merge flags with the config file: flag, then config, then default.
    #[must_use]
    pub fn resolve(self, config: &OperantsSection) -> OperantsOptions {
        let honor_flag = match (self.honor_prim_list, self.no_honor_prim_list) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        };
        let api_yaml = if self.api_yaml_path.is_empty() {
            config
                .api_yaml_path
                .clone()
                .unwrap_or_else(|| vec![Utf8PathBuf::from(DEFAULT_API_YAML)])
        } else {
            self.api_yaml_path
        };
        OperantsOptions {
            api_yaml,
            api_prim_yaml: pick(
                self.api_prim_yaml_path,
                config.api_prim_yaml_path.as_ref(),
                DEFAULT_API_PRIM_YAML,
            ),
            eager_header: pick(
                self.eager_tensor_operants_header_path,
                config.eager_tensor_operants_header_path.as_ref(),
                DEFAULT_EAGER_HEADER,
            ),
            eager_source: pick(
                self.eager_tensor_operants_source_path,
                config.eager_tensor_operants_source_path.as_ref(),
                DEFAULT_EAGER_SOURCE,
            ),
            static_header: pick(
                self.static_tensor_operants_header_path,
                config.static_tensor_operants_header_path.as_ref(),
                DEFAULT_STATIC_HEADER,
            ),
            static_source: pick(
                self.static_tensor_operants_source_path,
                config.static_tensor_operants_source_path.as_ref(),
                DEFAULT_STATIC_SOURCE,
            ),
            honor_prim_list: honor_flag
                .or(config.honor_prim_list)
                .unwrap_or(false),
        }
    }
}

impl OperantsOptions {
    fn path(&self, file: OperantsFile) -> &Utf8Path {
        match file {
            OperantsFile::EagerHeader => &self.eager_header,
            OperantsFile::EagerSource => &self.eager_source,
            OperantsFile::StaticHeader => &self.static_header,
            OperantsFile::StaticSource => &self.static_source,
        }
    }
}

/// Choose the whitelist for this run.
///
/// The prim list file is always read. With `honor_prim_list` it must be a
/// list of names and becomes the whitelist. Otherwise only YAML syntax
/// errors are fatal and the arithmetic whitelist is used.
fn select_prims(options: &OperantsOptions) -> Result<PrimList> {
    if options.honor_prim_list {
        let listed = PrimList::load(&options.api_prim_yaml)
            .into_diagnostic()
            .wrap_err("Failed to load primitive operator list")?;
        debug!(count = listed.len(), "Using prim list file");
        return Ok(listed);
    }
    let listed = PrimList::load_lenient(&options.api_prim_yaml)
        .into_diagnostic()
        .wrap_err("Failed to load primitive operator list")?;
    let temporary = PrimList::temporary();
    match listed {
        Some(listed) if listed == temporary => {}
        Some(listed) => warn!(
            path = %options.api_prim_yaml,
            listed = listed.len(),
            "Prim list file ignored; emitting only add, subtract, multiply and divide"
        ),
        None => warn!(
            path = %options.api_prim_yaml,
            "Prim list file is not a list of names; emitting only add, subtract, multiply and divide"
        ),
    }
    Ok(temporary)
}

/// Generate the four tensor operants files.
#[instrument(skip_all, fields(schemas = options.api_yaml.len()))]
pub fn run(options: &OperantsOptions) -> Result<()> {
    info!("Generating tensor operants");

    let records = load_op_documents(&options.api_yaml)
        .into_diagnostic()
        .wrap_err("Failed to load operator schema")?;
    info!(count = records.len(), "Loaded operator records");

    let config = GenerationConfig::new(select_prims(options)?);
    let output = generate_operants(&records, &config)
        .into_diagnostic()
        .wrap_err("Failed to generate tensor operants")?;

    write_outputs(&output, options)?;
    info!(emitted = output.emitted.len(), "Tensor operants generated");
    Ok(())
}

/// Write each file in turn, truncating existing content.
fn write_outputs(output: &OperantsOutput, options: &OperantsOptions) -> Result<()> {
    for (index, file) in OperantsFile::ALL.into_iter().enumerate() {
        let path = options.path(file);
        debug!(%file, %path, "Writing");
        fs::write(path, output.contents(file))
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write {file} '{path}'"))
            .inspect_err(|_| {
                error!(%file, %path, written = index, "Write failed; earlier files are left in place");
            })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OPS: &str = r"
- name: add
  inputs:
  - {typename: Tensor, name: x, optional: false}
  - {typename: Tensor, name: y, optional: false}
  attrs: []
  outputs:
  - {typename: Tensor, name: out, optional: false, intermediate: false}
- name: matmul
  inputs:
  - {typename: Tensor, name: x, optional: false}
  - {typename: Tensor, name: y, optional: false}
  attrs:
  - {typename: bool, name: transpose_x, default_value: 'false'}
  outputs:
  - {typename: Tensor, name: out, optional: false, intermediate: false}
";

    fn options_in(temp: &TempDir, prims: &str) -> OperantsOptions {
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        fs::write(root.join("ops.yaml"), OPS).unwrap();
        fs::write(root.join("api.yaml"), prims).unwrap();
        OperantsOptions {
            api_yaml: vec![root.join("ops.yaml")],
            api_prim_yaml: root.join("api.yaml"),
            eager_header: root.join("eager.h"),
            eager_source: root.join("eager.cc"),
            static_header: root.join("static.h"),
            static_source: root.join("static.cc"),
            honor_prim_list: false,
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let options = OperantsArgs::default().resolve(&OperantsSection::default());
        assert_eq!(options.api_yaml, [Utf8PathBuf::from(DEFAULT_API_YAML)]);
        assert_eq!(options.api_prim_yaml, DEFAULT_API_PRIM_YAML);
        assert_eq!(options.static_source, DEFAULT_STATIC_SOURCE);
        assert!(!options.honor_prim_list);
    }

    #[test]
    fn test_resolve_flag_beats_config() {
        let args = OperantsArgs {
            api_yaml_path: vec!["a.yaml".into(), "b.yaml".into()],
            eager_tensor_operants_header_path: Some("flag.h".into()),
            ..OperantsArgs::default()
        };
        let config = OperantsSection {
            api_yaml_path: Some(vec!["config.yaml".into()]),
            eager_tensor_operants_header_path: Some("config.h".into()),
            eager_tensor_operants_source_path: Some("config.cc".into()),
            honor_prim_list: Some(true),
            ..OperantsSection::default()
        };
        let options = args.resolve(&config);
        assert_eq!(
            options.api_yaml,
            [Utf8PathBuf::from("a.yaml"), Utf8PathBuf::from("b.yaml")]
        );
        assert_eq!(options.eager_header, "flag.h");
        assert_eq!(options.eager_source, "config.cc");
        assert!(options.honor_prim_list);
    }

    #[test]
    fn test_resolve_flag_turns_off_config_honor() {
        let args = OperantsArgs {
            no_honor_prim_list: true,
            ..OperantsArgs::default()
        };
        let config = OperantsSection {
            honor_prim_list: Some(true),
            ..OperantsSection::default()
        };
        assert!(!args.resolve(&config).honor_prim_list);

        let options = OperantsArgs::default().resolve(&config);
        assert!(options.honor_prim_list);
    }

    #[test]
    fn test_mapping_prim_list_is_ignored_by_default() {
        let temp = TempDir::new().unwrap();
        let options = options_in(&temp, "add: true\nmatmul: true\n");
        run(&options).unwrap();
        for file in OperantsFile::ALL {
            assert!(options.path(file).exists(), "{file} should exist");
        }
        let eager_header = fs::read_to_string(&options.eager_header).unwrap();
        assert!(eager_header.contains("  Tensor add(const Tensor& x, const Tensor& y);\n"));
        assert!(!eager_header.contains("matmul"));
    }

    #[test]
    fn test_mapping_prim_list_fails_when_honored() {
        let temp = TempDir::new().unwrap();
        let mut options = options_in(&temp, "add: true\n");
        options.honor_prim_list = true;
        assert!(run(&options).is_err());
        assert!(!options.eager_header.exists());
    }

    #[test]
    fn test_invalid_yaml_prim_list_fails() {
        let temp = TempDir::new().unwrap();
        let options = options_in(&temp, "- add\n  - [exp\n");
        assert!(run(&options).is_err());
        assert!(!options.eager_header.exists());
    }

    #[test]
    fn test_run_writes_four_files() {
        let temp = TempDir::new().unwrap();
        let options = options_in(&temp, "- add\n- matmul\n");
        run(&options).unwrap();

        let eager_header = fs::read_to_string(&options.eager_header).unwrap();
        let static_header = fs::read_to_string(&options.static_header).unwrap();
        let eager_source = fs::read_to_string(&options.eager_source).unwrap();
        let static_source = fs::read_to_string(&options.static_source).unwrap();

        assert!(eager_header.contains("  Tensor add(const Tensor& x, const Tensor& y);\n"));
        assert!(!eager_header.contains("matmul"));
        assert!(static_header.contains("  Tensor add(const Tensor& x, const Tensor& y);\n"));
        assert!(eager_source.contains("return ::add_ad_func(x, y);"));
        assert!(static_source.contains("return paddle::prim::add<DescTensor>(x, y);"));
    }

    #[test]
    fn test_run_honors_prim_list_when_asked() {
        let temp = TempDir::new().unwrap();
        let mut options = options_in(&temp, "- matmul\n");
        options.honor_prim_list = true;
        run(&options).unwrap();

        let eager_header = fs::read_to_string(&options.eager_header).unwrap();
        assert!(eager_header.contains(
            "  Tensor matmul(const Tensor& x, const Tensor& y, bool transpose_x = false);\n"
        ));
        assert!(!eager_header.contains(" add("));
    }

    #[test]
    fn test_run_overwrites_existing_output() {
        let temp = TempDir::new().unwrap();
        let options = options_in(&temp, "- add\n");
        fs::write(&options.eager_source, "stale contents that must disappear").unwrap();
        run(&options).unwrap();
        let first = fs::read_to_string(&options.eager_source).unwrap();
        assert!(!first.contains("stale"));

        run(&options).unwrap();
        assert_eq!(fs::read_to_string(&options.eager_source).unwrap(), first);
    }

    #[test]
    fn test_missing_prim_list_creates_no_output() {
        let temp = TempDir::new().unwrap();
        let mut options = options_in(&temp, "");
        options.api_prim_yaml = options.api_prim_yaml.with_file_name("missing.yaml");
        assert!(run(&options).is_err());
        for file in OperantsFile::ALL {
            assert!(!options.path(file).exists(), "{file} should not exist");
        }
    }

    #[test]
    fn test_missing_output_directory_fails() {
        let temp = TempDir::new().unwrap();
        let mut options = options_in(&temp, "");
        options.static_source = options.static_source.with_file_name("no/such/dir/static.cc");
        assert!(run(&options).is_err());
        // Files before the failing one are left written.
        assert!(options.eager_header.exists());
        assert!(options.static_header.exists());
    }
}
