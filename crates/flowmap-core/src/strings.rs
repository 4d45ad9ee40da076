//! UI string table.
//!
//! Built-in Russian and English texts for every label the map shows. A TOML
//! overlay keyed by language code can replace individual entries:
//!
//! ```toml
//! [en]
//! reset = "Restart"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde::de::IntoDeserializer;

use flowmap_types::error::{FlowError, Result};
use flowmap_types::text::Lang;

/// Identifies one UI text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKey {
    PageTitle,
    Heading,
    Lead,
    Back,
    Reset,
    AnswerLabel,
    ErrorLoading,
    LanguageSwitcher,
    PanelToggleLabel,
    PanelToggleShow,
    PanelToggleHide,
    ProgressLegend,
    BranchHint,
    OptionCurrent,
    ResultBadge,
    SidePanelTitle,
    SidePanelEmpty,
    ResultSelectPrompt,
    StepLabel,
    FlameLabel,
    OdourLabel,
    SpeedLabel,
    OtherLabel,
}

impl TextKey {
    pub const ALL: [TextKey; 23] = [
        TextKey::PageTitle,
        TextKey::Heading,
        TextKey::Lead,
        TextKey::Back,
        TextKey::Reset,
        TextKey::AnswerLabel,
        TextKey::ErrorLoading,
        TextKey::LanguageSwitcher,
        TextKey::PanelToggleLabel,
        TextKey::PanelToggleShow,
        TextKey::PanelToggleHide,
        TextKey::ProgressLegend,
        TextKey::BranchHint,
        TextKey::OptionCurrent,
        TextKey::ResultBadge,
        TextKey::SidePanelTitle,
        TextKey::SidePanelEmpty,
        TextKey::ResultSelectPrompt,
        TextKey::StepLabel,
        TextKey::FlameLabel,
        TextKey::OdourLabel,
        TextKey::SpeedLabel,
        TextKey::OtherLabel,
    ];

    /// Parse a snake_case key name such as `progress_legend`.
    pub fn from_name(name: &str) -> Result<TextKey> {
        TextKey::deserialize(name.into_deserializer()).map_err(|e: serde::de::value::Error| {
            FlowError::Config(format!("unknown text key: {e}"))
        })
    }

    /// Built-in `(ru, en)` pair.
    fn builtin(self) -> (&'static str, &'static str) {
        match self {
            TextKey::PageTitle | TextKey::Heading => (
                "Интерактивная идентификация пластиков",
                "Interactive Plastic Identification",
            ),
            TextKey::Lead => (
                "Следуйте шагам блок-схемы: отвечайте на вопросы и сравнивайте наблюдения, \
                 чтобы сузить круг подходящих материалов. В любой момент можно вернуться \
                 на шаг назад или начать заново.",
                "Follow the flowchart: answer the questions and compare your observations \
                 to narrow down possible plastics. You can step back or restart at any moment.",
            ),
            TextKey::Back => ("Назад", "Back"),
            TextKey::Reset => ("Начать заново", "Start over"),
            TextKey::AnswerLabel => ("Ответ:", "Answer:"),
            TextKey::ErrorLoading => (
                "Не удалось загрузить следующий шаг.",
                "Failed to load the next step.",
            ),
            TextKey::LanguageSwitcher => ("Переключатель языка", "Language selector"),
            TextKey::PanelToggleLabel => ("Инфо", "Info"),
            TextKey::PanelToggleShow => ("Открыть панель маршрута", "Open the route panel"),
            TextKey::PanelToggleHide => ("Скрыть панель маршрута", "Hide the route panel"),
            TextKey::ProgressLegend => ("Узлы на маршруте", "Nodes on the route"),
            TextKey::BranchHint => (
                "Щёлкните, чтобы перестроить ветку с этого шага.",
                "Click to rebuild the branch from this step.",
            ),
            TextKey::OptionCurrent => ("Выберите направление", "Choose a direction"),
            TextKey::ResultBadge => ("Результат", "Result"),
            TextKey::SidePanelTitle => ("Маршрут", "Route"),
            TextKey::SidePanelEmpty => (
                "Ответы появятся после первого шага.",
                "Your answers will appear after the first step.",
            ),
            TextKey::ResultSelectPrompt => (
                "Выберите материал, чтобы раскрыть карточку свойств.",
                "Select a material to reveal its properties.",
            ),
            TextKey::StepLabel => ("Шаг", "Step"),
            TextKey::FlameLabel => ("Цвет пламени:", "Flame colour:"),
            TextKey::OdourLabel => ("Запах:", "Odour:"),
            TextKey::SpeedLabel => ("Скорость горения:", "Burn rate:"),
            TextKey::OtherLabel => ("Другие признаки:", "Other traits:"),
        }
    }
}

/// Per-language UI text lookup.
#[derive(Debug, Clone)]
pub struct Strings {
    tables: HashMap<Lang, HashMap<TextKey, String>>,
}

impl Default for Strings {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Strings {
    /// The built-in Russian and English tables.
    pub fn builtin() -> Self {
        let mut ru = HashMap::new();
        let mut en = HashMap::new();
        for key in TextKey::ALL {
            let (r, e) = key.builtin();
            ru.insert(key, r.to_string());
            en.insert(key, e.to_string());
        }
        let mut tables = HashMap::new();
        tables.insert(Lang::Ru, ru);
        tables.insert(Lang::En, en);
        Self { tables }
    }

    /// Built-in tables with the entries from a TOML overlay applied.
    pub fn from_toml(source: &str) -> Result<Self> {
        let mut strings = Self::builtin();
        strings.apply_toml(source)?;
        Ok(strings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        log::info!("Loading UI strings from {}", path.display());
        Self::from_toml(&source)
    }

    /// Replace entries from a TOML overlay. Unknown keys are rejected.
    pub fn apply_toml(&mut self, source: &str) -> Result<()> {
        let overlay: HashMap<String, HashMap<String, String>> = toml::from_str(source)?;
        for (code, entries) in overlay {
            let lang = Lang::from_code(&code)
                .ok_or_else(|| FlowError::Config(format!("unsupported language '{code}'")))?;
            for (name, value) in entries {
                let key = TextKey::from_name(&name)?;
                if value.trim().is_empty() {
                    return Err(FlowError::Config(format!(
                        "empty text for '{name}' in '{lang}'"
                    )));
                }
                self.set(lang, key, value);
            }
        }
        Ok(())
    }

    pub fn set(&mut self, lang: Lang, key: TextKey, value: impl Into<String>) {
        self.tables.entry(lang).or_default().insert(key, value.into());
    }

    /// Text for `key` in `lang`, falling back to the default language.
    pub fn text(&self, key: TextKey, lang: Lang) -> &str {
        self.lookup(key, lang)
            .or_else(|| self.lookup(key, Lang::FALLBACK))
            .unwrap_or("")
    }

    fn lookup(&self, key: TextKey, lang: Lang) -> Option<&str> {
        self.tables
            .get(&lang)
            .and_then(|t| t.get(&key))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `"<step label> <n>"`, the stand-in title for an untitled step.
    pub fn step_label(&self, number: usize, lang: Lang) -> String {
        format!("{} {number}", self.text(TextKey::StepLabel, lang))
    }
}
