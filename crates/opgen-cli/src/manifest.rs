// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generator configuration file parsing.
//!
//! An optional `opgen.toml` supplies per-checkout defaults for the
//! generator paths, so build scripts do not have to repeat every flag:
//!
//! ```toml
//! [operants]
//! api_yaml_path = ["paddle/phi/api/yaml/ops.yaml", "paddle/phi/api/yaml/legacy_ops.yaml"]
//! api_prim_yaml_path = "paddle/fluid/prim/api/api.yaml"
//!
//! [extra_info]
//! op_compat_yaml_path = "paddle/phi/api/yaml/op_compat.yaml"
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;

/// File name looked up in the working directory.
pub const MANIFEST_FILE: &str = "opgen.toml";

/// The top-level configuration structure parsed from `opgen.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub operants: OperantsSection,
    #[serde(default)]
    pub extra_info: ExtraInfoSection,
}

/// `[operants]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperantsSection {
    pub api_yaml_path: Option<Vec<Utf8PathBuf>>,
    pub api_prim_yaml_path: Option<Utf8PathBuf>,
    pub eager_tensor_operants_header_path: Option<Utf8PathBuf>,
    pub eager_tensor_operants_source_path: Option<Utf8PathBuf>,
    pub static_tensor_operants_header_path: Option<Utf8PathBuf>,
    pub static_tensor_operants_source_path: Option<Utf8PathBuf>,
    /// Use the prim list file instead of the built-in arithmetic whitelist.
    pub honor_prim_list: Option<bool>,
}

/// `[extra_info]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraInfoSection {
    pub op_compat_yaml_path: Option<Utf8PathBuf>,
    pub ops_extra_info_path: Option<Utf8PathBuf>,
}

/// Parse a configuration file.
///
/// Returns an error if the file cannot be read, is not valid TOML, or
/// contains unknown keys.
pub fn parse_manifest(path: &Utf8Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read config '{path}'"))?;

    toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse config '{path}'"))
}

/// Look for `opgen.toml` in the given directory and parse it if found.
///
/// Returns `None` if no file exists. Returns an error if the file exists but
/// is malformed.
pub fn find_manifest(dir: &Utf8Path) -> Result<Option<Manifest>> {
    let manifest_path = dir.join(MANIFEST_FILE);
    if manifest_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat config '{manifest_path}'"))?
    {
        parse_manifest(&manifest_path).map(Some)
    } else {
        Ok(None)
    }
}

/// Load the configuration for this run.
///
/// An explicit path must exist. Without one, `opgen.toml` in the current
/// directory is used if present, and an empty configuration otherwise.
pub fn load(explicit: Option<&Utf8Path>) -> Result<Manifest> {
    if let Some(path) = explicit {
        return parse_manifest(path);
    }
    let cwd = std::env::current_dir()
        .into_diagnostic()
        .wrap_err("Failed to determine current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|_| miette::miette!("Non-UTF-8 path"))?;
    Ok(find_manifest(&cwd)?.unwrap_or_default())
}
