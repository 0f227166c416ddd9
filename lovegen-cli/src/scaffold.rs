use crate::error::{LovegenError, Result};
use log::debug;
use lovegen_config::Settings;
use lovegen_gemini::{GeminiClient, TextGenerator};
use lovegen_project::{SaveProjectOptions, SavedProject, save_main_lua};
use lovegen_prompt::craft_prompt;
use lovegen_utils::strip_code_fences;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    pub code: String,
    pub project: SavedProject,
}

/// Build a Gemini client from the resolved settings.
///
/// Fails before any network activity when no API key was found.
pub fn connect(settings: &Settings) -> Result<GeminiClient> {
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or_else(|| LovegenError::MissingCredential {
            env_var: settings.api_key_env_var.clone(),
        })?;

    Ok(GeminiClient::new(api_key, &settings.model)?)
}

/// Ask the generator for a game matching `concept` and return the bare Lua source.
pub fn generate_code<G>(generator: &G, concept: &str) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    let prompt = craft_prompt(concept);
    debug!("Prompt is {} bytes", prompt.len());

    let raw = generator.generate_text(&prompt)?;
    let code = strip_code_fences(&raw);
    if code.is_empty() {
        return Err(LovegenError::EmptyCode);
    }

    Ok(code)
}

/// Generate code for `concept` and write it into the configured project directory.
pub fn scaffold<G>(generator: &G, concept: &str, settings: &Settings) -> Result<Scaffolded>
where
    G: TextGenerator + ?Sized,
{
    let code = generate_code(generator, concept)?;
    let project = save_main_lua(
        &code,
        SaveProjectOptions {
            output_dir: &settings.output_dir,
            assets_dir: &settings.assets_dir,
            file_name: None,
        },
    )?;

    Ok(Scaffolded { code, project })
}

/// Connect to Gemini with the configured key, then scaffold.
pub fn run_scaffold(concept: &str, settings: &Settings) -> Result<Scaffolded> {
    let client = connect(settings)?;
    scaffold(&client, concept, settings)
}
