//! Shell completion generation for symposium
//!
//! Generates clap completion scripts for bash, zsh and fish, extended so that
//! `resolve` completes `@/` and `#/` tokens through symposium itself.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{ConfigError, Result};

const BIN_NAME: &str = "symposium";

/// Generate shell completion script
///
/// # Arguments
/// * `shell_name` - Shell type (bash, zsh, fish)
///
/// # Returns
/// * `Result<()>` - Success or error
pub fn generate_completion(shell_name: &str) -> Result<()> {
    let shell = parse_shell(shell_name)?;
    print!("{}", completion_script(shell));
    Ok(())
}

/// Parse shell name string to Shell enum
fn parse_shell(shell_name: &str) -> Result<Shell> {
    match shell_name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        _ => Err(ConfigError::InvalidValue {
            field: "shell".to_string(),
            value: format!("{shell_name} (supported shells: bash, zsh, fish)"),
        }
        .into()),
    }
}

/// Base clap script for `shell`
fn base_script(shell: Shell) -> String {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Full script: the clap script plus command-token completion for `resolve`
fn completion_script(shell: Shell) -> String {
    let basic_completion = base_script(shell);

    match shell {
        Shell::Zsh => format!(
            r#"{basic_completion}

# Resolve @/ and #/ tokens through symposium
_symposium_tokens() {{
    local -a tokens
    tokens=(${{(f)"$(symposium --format plain --no-color -q resolve "$PREFIX" 2>/dev/null)"}})
    compadd -S '' -- $tokens
}}

_symposium_enhanced() {{
    if [[ ${{words[2]}} == "resolve" && ( $PREFIX == @/* || $PREFIX == '#/'* ) ]]; then
        _symposium_tokens
        return 0
    fi
    _symposium "$@"
}}

compdef _symposium_enhanced symposium
"#
        ),
        Shell::Fish => format!(
            r#"{basic_completion}

# Resolve @/ and #/ tokens through symposium
function __symposium_tokens
    set -l token (commandline -ct)
    string match -qr '^[@#]/' -- $token; or return
    symposium --format plain --no-color -q resolve $token 2>/dev/null
end

complete -c symposium -n "__fish_seen_subcommand_from resolve" -f -a "(__symposium_tokens)"
"#
        ),
        _ => format!(
            r#"{basic_completion}

# Resolve @/ and #/ tokens through symposium
_symposium_complete_token() {{
    local cur="$1"
    local IFS=$'\n'
    COMPREPLY=($(symposium --format plain --no-color -q resolve "$cur" 2>/dev/null))
    compopt -o nospace 2>/dev/null
}}

_symposium_enhanced() {{
    local cur prev words cword
    _init_completion -n @# || return

    if [[ "${{words[1]}}" == "resolve" && ( "$cur" == @/* || "$cur" == \#/* ) ]]; then
        _symposium_complete_token "$cur"
        return 0
    fi

    _symposium "$@"
}}

complete -F _symposium_enhanced symposium
"#
        ),
    }
}
