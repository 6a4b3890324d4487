//! Stage builder registry
//!
//! Maps each [`Stage`] to the builder that resolves its variants. The
//! assembler only ever talks to the registry, so a stage can be swapped for
//! a test double without touching the assembly logic.
//!
//! ```rust,ignore
//! let registry = BuilderRegistry::with_builtins()?;
//! let builder = registry.get(Stage::WakeWord).expect("registered");
//! assert!(builder.supported_variants().contains(&"porcupine"));
//! ```

use std::collections::HashMap;

use crate::builders::StageBuilder;
use crate::builders::dialogue::DialogueBuilder;
use crate::builders::handle::HandleBuilder;
use crate::builders::intent::IntentBuilder;
use crate::builders::microphone::MicrophoneBuilder;
use crate::builders::speakers::SpeakersBuilder;
use crate::builders::speech_to_text::SpeechToTextBuilder;
use crate::builders::text_to_speech::TextToSpeechBuilder;
use crate::builders::wake::WakeBuilder;
use crate::builders::webhooks::WebhooksBuilder;
use crate::error::{self, Result};
use crate::stage::Stage;

/// Registry of stage builders, one per stage
#[derive(Debug, Default)]
pub struct BuilderRegistry {
    builders: HashMap<Stage, Box<dyn StageBuilder>>,
}

impl BuilderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in builder
    ///
    /// # Errors
    ///
    /// Returns an error if two built-in builders claim the same stage.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();

        macro_rules! register_builders {
            ($($builder:expr),* $(,)?) => {
                $(registry.register(Box::new($builder))?;)*
            };
        }

        register_builders![
            MicrophoneBuilder,
            WakeBuilder,
            SpeechToTextBuilder,
            IntentBuilder,
            HandleBuilder,
            DialogueBuilder,
            TextToSpeechBuilder,
            SpeakersBuilder,
            WebhooksBuilder,
        ];

        Ok(registry)
    }

    /// Register a builder under its stage
    ///
    /// # Errors
    ///
    /// Returns `CompileError::DuplicateBuilder` if the stage already has one.
    pub fn register(&mut self, builder: Box<dyn StageBuilder>) -> Result<()> {
        let stage = builder.stage();
        if self.builders.contains_key(&stage) {
            return Err(error::stage::duplicate_builder(stage.name()));
        }
        self.builders.insert(stage, builder);
        Ok(())
    }

    pub fn get(&self, stage: Stage) -> Option<&dyn StageBuilder> {
        self.builders.get(&stage).map(|builder| &**builder)
    }
}
