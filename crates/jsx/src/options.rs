//! Transformation options and their layered resolution.

use cereal_core::{ParseWarning, Recovery};
use serde::{Deserialize, Serialize};

const DEFAULT_FRONT_MATTER_MODE: &str = "reacthelmet";
const DEFAULT_CONTEXT_NAME: &str = "ReactHeadContext";
const DEFAULT_CONTEXT_VAR_NAME: &str = "reactHead";

/// How the metadata block is exposed in the generated component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterMode {
    /// Exported declarations plus a head-context provider around the markup.
    HeadContext,
    /// Exported declarations only.
    Declarations,
    /// Metadata is dropped.
    Omit,
}

impl FrontMatterMode {
    /// Parses a mode name.
    ///
    /// Names are matched after trimming and lowercasing. An unrecognized name
    /// recovers to [`FrontMatterMode::Declarations`].
    pub fn parse(value: &str) -> Recovery<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reacthelmet" | "headcontext" | "reactheadcontext" => Recovery::Clean(Self::HeadContext),
            "variables" | "declarations" => Recovery::Clean(Self::Declarations),
            "none" | "off" => Recovery::Clean(Self::Omit),
            _ => Recovery::Recovered {
                value: Self::Declarations,
                warning: ParseWarning::UnrecognizedOption {
                    name: "frontMatterMode".to_string(),
                    value: value.to_string(),
                    fallback: Self::Declarations.as_str().to_string(),
                },
            },
        }
    }

    /// Canonical configuration spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeadContext => "reacthelmet",
            Self::Declarations => "variables",
            Self::Omit => "none",
        }
    }
}

/// One layer of user-supplied option values. Unset fields defer to the
/// layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    /// `reacthelmet`, `variables`, `none`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_matter_mode: Option<String>,
    /// Name of the head context component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_head_context_name: Option<String>,
    /// Name of the metadata object passed to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_head_context_var_name: Option<String>,
    /// Module the head context is imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub react_head_context_import: Option<String>,
}

impl OptionOverrides {
    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn merge(mut self, other: &OptionOverrides) -> Self {
        if let Some(mode) = &other.front_matter_mode {
            self.front_matter_mode = Some(mode.clone());
        }
        if let Some(name) = &other.react_head_context_name {
            self.react_head_context_name = Some(name.clone());
        }
        if let Some(name) = &other.react_head_context_var_name {
            self.react_head_context_var_name = Some(name.clone());
        }
        if let Some(import) = &other.react_head_context_import {
            self.react_head_context_import = Some(import.clone());
        }
        self
    }
}

/// Resolved, immutable options for one transformation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// How metadata is exposed.
    pub front_matter_mode: FrontMatterMode,
    /// Head context component name.
    pub react_head_context_name: String,
    /// Metadata object variable name.
    pub react_head_context_var_name: String,
    /// Module to import the context from; `None` declares it locally.
    pub react_head_context_import: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            front_matter_mode: FrontMatterMode::HeadContext,
            react_head_context_name: DEFAULT_CONTEXT_NAME.to_string(),
            react_head_context_var_name: DEFAULT_CONTEXT_VAR_NAME.to_string(),
            react_head_context_import: None,
        }
    }
}

impl Options {
    /// Resolves defaults plus `layers`, later layers taking precedence.
    ///
    /// An unrecognized front matter mode is reported once at warn level and
    /// resolved to [`FrontMatterMode::Declarations`].
    pub fn resolve<'a>(layers: impl IntoIterator<Item = &'a OptionOverrides>) -> Self {
        let merged = layers
            .into_iter()
            .fold(OptionOverrides::default(), |acc, layer| acc.merge(layer));
        let resolved = Self::try_resolve(&merged);
        if let Some(warning) = resolved.warning() {
            log::warn!("{}", warning);
        }
        resolved.into_value()
    }

    /// Resolves a single merged layer, reporting recovery instead of logging.
    pub fn try_resolve(overrides: &OptionOverrides) -> Recovery<Self> {
        let defaults = Self::default();
        let mode = FrontMatterMode::parse(
            overrides
                .front_matter_mode
                .as_deref()
                .unwrap_or(DEFAULT_FRONT_MATTER_MODE),
        );

        mode.map(|front_matter_mode| Self {
            front_matter_mode,
            react_head_context_name: non_empty(&overrides.react_head_context_name)
                .unwrap_or(defaults.react_head_context_name),
            react_head_context_var_name: non_empty(&overrides.react_head_context_var_name)
                .unwrap_or(defaults.react_head_context_var_name),
            react_head_context_import: non_empty(&overrides.react_head_context_import),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
