/*!
 * Language utilities for translation target handling.
 *
 * Language identifiers follow the `<ISO 639-3>_<ISO 15924 script>` scheme
 * used by multilingual translation models (`spa_Latn`, `hin_Deva`). The
 * short display codes sent to clients are derived from the ISO 639-3 part.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Validated language identifier such as `spa_Latn`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageId {
    id: String,
}

impl LanguageId {
    /// Full identifier, e.g. `spa_Latn`
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// ISO 639-3 part of the identifier, e.g. `spa`
    pub fn iso_639_3(&self) -> &str {
        self.id.split('_').next().unwrap_or(&self.id)
    }

    /// Script part of the identifier, e.g. `Latn`
    pub fn script(&self) -> &str {
        self.id.split('_').nth(1).unwrap_or("")
    }

    /// English language name, e.g. `Spanish`
    pub fn language_name(&self) -> Result<String> {
        let lang = Language::from_639_3(self.iso_639_3())
            .ok_or_else(|| anyhow!("Failed to get language from code: {}", self.id))?;
        Ok(lang.to_name().to_string())
    }

    /// ISO 639-1 code when one exists, otherwise the ISO 639-3 code
    pub fn default_display_code(&self) -> String {
        Language::from_639_3(self.iso_639_3())
            .and_then(|lang| lang.to_639_1())
            .map(|code| code.to_string())
            .unwrap_or_else(|| self.iso_639_3().to_string())
    }
}

impl FromStr for LanguageId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (language, script) = s
            .split_once('_')
            .ok_or_else(|| anyhow!("Invalid language identifier: {}", s))?;

        if language.len() != 3 || !language.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(anyhow!("Invalid language part in identifier: {}", s));
        }

        let mut script_chars = script.chars();
        let well_formed_script = script.len() == 4
            && script_chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && script_chars.all(|c| c.is_ascii_lowercase());
        if !well_formed_script {
            return Err(anyhow!("Invalid script part in identifier: {}", s));
        }

        if Language::from_639_3(language).is_none() {
            return Err(anyhow!("Unknown ISO 639-3 language code: {}", language));
        }

        Ok(Self { id: s.to_string() })
    }
}

impl TryFrom<String> for LanguageId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LanguageId> for String {
    fn from(value: LanguageId) -> Self {
        value.id
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// One supported translation target and its client-facing code
#[derive(Debug, Clone, PartialEq)]
pub struct TargetLanguage {
    pub id: LanguageId,
    pub code: String,
}

/// Ordered registry of the target languages this deployment serves
#[derive(Debug, Clone)]
pub struct SupportedTargets {
    targets: Vec<TargetLanguage>,
}

impl SupportedTargets {
    /// Build the registry, rejecting duplicate identifiers or codes
    pub fn new(targets: Vec<TargetLanguage>) -> Result<Self> {
        if targets.is_empty() {
            return Err(anyhow!("At least one target language must be supported"));
        }

        for (i, target) in targets.iter().enumerate() {
            if target.code.trim().is_empty() {
                return Err(anyhow!("Empty display code for {}", target.id));
            }
            for other in &targets[i + 1..] {
                if other.id == target.id {
                    return Err(anyhow!("Duplicate target language: {}", target.id));
                }
                if other.code == target.code {
                    return Err(anyhow!("Duplicate display code: {}", target.code));
                }
            }
        }

        Ok(Self { targets })
    }

    /// All supported identifiers in configured order
    pub fn ids(&self) -> Vec<LanguageId> {
        self.targets.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Client-facing code for a supported identifier
    pub fn display_code(&self, id: &LanguageId) -> Option<&str> {
        self.targets
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.code.as_str())
    }

    /// Resolve a client's requested targets against the supported set.
    ///
    /// `None` selects every supported target. A requested list keeps only
    /// supported identifiers, in request order, without repeats; the result
    /// may be empty.
    pub fn resolve(&self, requested: Option<&[String]>) -> Vec<LanguageId> {
        let Some(requested) = requested else {
            return self.ids();
        };

        let mut resolved: Vec<LanguageId> = Vec::new();
        for wanted in requested {
            if let Some(target) = self.targets.iter().find(|t| t.id.as_str() == wanted) {
                if !resolved.contains(&target.id) {
                    resolved.push(target.id.clone());
                }
            }
        }
        resolved
    }

    /// Key translated strings by display code, dropping unsupported identifiers
    pub fn to_display_map(&self, translations: &HashMap<LanguageId, String>) -> BTreeMap<String, String> {
        self.targets
            .iter()
            .filter_map(|t| {
                translations
                    .get(&t.id)
                    .map(|text| (t.code.clone(), text.clone()))
            })
            .collect()
    }
}
