use crate::config::{COMMIT_TYPE_CONVENTIONAL, CommitSettings, find_language};

const CONVENTIONAL_FORMAT: &str = "<type>(<optional scope>): <commit message>";

const CONVENTIONAL_TYPES: &str = r#"Choose a type that best describes the git diff:
- docs: Documentation only changes
- style: Changes that do not affect the meaning of the code (white-space, formatting, etc)
- refactor: A code change that neither fixes a bug nor adds a feature
- perf: A code change that improves performance
- test: Adding missing tests or correcting existing tests
- build: Changes that affect the build system or external dependencies
- ci: Changes to our CI configuration files and scripts
- chore: Other changes that don't modify src or test files
- revert: Reverts a previous commit
- feat: A new feature
- fix: A bug fix"#;

/// System prompt describing the message we want for the staged diff.
pub fn build_system_prompt(settings: &CommitSettings) -> String {
    let language = find_language(&settings.language)
        .map(|lang| lang.prompt_name)
        .unwrap_or(settings.language.as_str());

    let mut prompt = format!(
        "Generate a concise git commit message written in present tense for the following code diff with the given specifications below:\n\
         Message language: {language}\n\
         Commit message must be a maximum of {} characters.\n\
         Exclude anything unnecessary such as translation. Your entire response will be passed directly into git commit.\n",
        settings.max_length
    );

    if settings.commit_type == COMMIT_TYPE_CONVENTIONAL {
        prompt.push_str(CONVENTIONAL_TYPES);
        prompt.push('\n');
        prompt.push_str("The output response must be in format:\n");
        prompt.push_str(CONVENTIONAL_FORMAT);
        prompt.push('\n');
    }

    prompt
}
