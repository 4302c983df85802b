//! Prompt template loading and rendering via `minijinja`.
//!
//! The templates ship inside the binary. Operators can override any of
//! them by dropping a file with the same name into a templates directory,
//! so prompts can be tuned without recompiling.

use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::error::NarratorError;
use crate::story::{EventsContext, StoryContext};

/// Template names and their built-in sources. Override files are named
/// `{name}.j2`.
const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("events_system", include_str!("../templates/events_system.j2")),
    ("events_user", include_str!("../templates/events_user.j2")),
    ("story_system", include_str!("../templates/story_system.j2")),
    ("story_user", include_str!("../templates/story_user.j2")),
];

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message.
    pub system: String,
    /// User message.
    pub user: String,
}

/// Holds the prompt templates.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Engine with the built-in templates only.
    pub fn builtin() -> Result<Self, NarratorError> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| NarratorError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(Self { env })
    }

    /// Engine with the built-in templates, overridden by any `{name}.j2`
    /// file present in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, NarratorError> {
        let mut engine = Self::builtin()?;
        for (name, _) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{name}.j2"));
            if !path.is_file() {
                continue;
            }
            let source = std::fs::read_to_string(&path).map_err(|e| {
                NarratorError::Template(format!("failed to read {}: {e}", path.display()))
            })?;
            engine
                .env
                .add_template_owned(name, source)
                .map_err(|e| NarratorError::Template(format!("failed to add {name} template: {e}")))?;
        }
        Ok(engine)
    }

    /// Render the event generation prompt.
    pub fn render_events(&self, context: &EventsContext) -> Result<RenderedPrompt, NarratorError> {
        self.render_pair("events_system", "events_user", context)
    }

    /// Render the story prompt.
    pub fn render_story(&self, context: &StoryContext) -> Result<RenderedPrompt, NarratorError> {
        self.render_pair("story_system", "story_user", context)
    }

    fn render_pair(
        &self,
        system: &str,
        user: &str,
        context: &impl Serialize,
    ) -> Result<RenderedPrompt, NarratorError> {
        Ok(RenderedPrompt {
            system: self.render(system, context)?,
            user: self.render(user, context)?,
        })
    }

    fn render(&self, name: &str, context: &impl Serialize) -> Result<String, NarratorError> {
        self.env
            .get_template(name)
            .map_err(|e| NarratorError::Template(format!("missing {name} template: {e}")))?
            .render(context)
            .map_err(|e| NarratorError::Template(format!("{name} render failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use lifetree_types::{
        ConsciousnessSample, EventCategory, Karma, LifeEvent, StoryRequest, TriggeredEvent,
    };

    use super::*;

    fn story_context() -> StoryContext {
        let request = StoryRequest {
            history: (0..20)
                .map(|i| ConsciousnessSample {
                    progress: f64::from(i) / 20.0,
                    consciousness: if i < 10 { -0.6 } else { 0.6 },
                    timestamp_ms: 0,
                })
                .collect(),
            events: vec![TriggeredEvent::fire(
                &LifeEvent::at_age("Lottery Win", 40, EventCategory::Dharmic),
                0.6,
            )],
            karma: Karma::new(0.3),
            final_consciousness: 0.6,
        };
        StoryContext::from_request(&request)
            .ok()
            .unwrap_or_else(|| StoryContext {
                average: String::new(),
                max: String::new(),
                min: String::new(),
                final_consciousness: String::new(),
                karma: String::new(),
                transmuted: Vec::new(),
                fallen: Vec::new(),
                neutral: Vec::new(),
                trajectory: Vec::new(),
            })
    }

    #[test]
    fn builtin_story_prompt_renders_statistics_and_events() {
        let engine = PromptEngine::builtin();
        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };

        let prompt = engine.render_story(&story_context());
        assert!(prompt.is_ok(), "render failed: {prompt:?}");
        let prompt = prompt.ok().map(|p| p.user).unwrap_or_default();

        assert!(prompt.contains("Resulting karma for the next life: 0.30"));
        assert!(prompt.contains("- Lottery Win (40 years) - Consciousness: 0.60"));
        assert!(prompt.contains("Childhood: mostly in shadow (-0.60)"));
        assert!(prompt.contains("Old age: mostly in the light (0.60)"));
        assert!(prompt.contains("- None"));
    }

    #[test]
    fn builtin_events_prompt_mentions_karma() {
        let engine = PromptEngine::builtin();
        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };
        let prompt = engine.render_events(&EventsContext::new(Karma::new(0.5)));
        let prompt = prompt.ok().unwrap_or_else(|| RenderedPrompt {
            system: String::new(),
            user: String::new(),
        });
        assert!(prompt.user.contains("0.50 (positive"));
        assert!(prompt.system.contains("between 20 and 25 events"));
    }

    #[test]
    fn directory_overrides_single_template() {
        let unique = format!(
            "lifetree_test_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("events_user.j2"), "karma={{ karma }}").ok();

        let engine = PromptEngine::from_dir(&dir);
        std::fs::remove_dir_all(&dir).ok();

        assert!(engine.is_ok());
        let Ok(engine) = engine else { return };
        let prompt = engine.render_events(&EventsContext::new(Karma::new(-0.25)));
        assert!(prompt.as_ref().is_ok_and(|p| p.user == "karma=-0.25"));
        assert!(prompt.is_ok_and(|p| p.system.contains("designer of destinies")));
    }

    #[test]
    fn broken_override_is_a_template_error() {
        let unique = format!(
            "lifetree_test_broken_templates_{}_{:?}",
            std::process::id(),
            std::thread::current().id(),
        );
        let dir = std::env::temp_dir().join(unique);
        std::fs::create_dir_all(&dir).ok();
        std::fs::write(dir.join("story_user.j2"), "{% for x in %}").ok();

        let engine = PromptEngine::from_dir(&dir);
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(engine, Err(NarratorError::Template(_))));
    }
}
