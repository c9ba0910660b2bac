//! `token` command: cache refresh and masked inspection.

use crate::cli::args::TokenCommand;
use crate::core::ApiClient;
use crate::error::Result;

/// Visible prefix length in the masked preview.
const PREVIEW_LEN: usize = 12;

pub async fn execute(client: &ApiClient, command: &TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Refresh => {
            client.session().clear();
            let token = client.session().public_token(true).await?;
            println!("Token refreshed successfully");
            println!("Token preview: {}", mask(&token));
        }
        TokenCommand::Show => {
            let token = client.session().public_token(false).await?;
            println!("Token preview: {}", mask(&token));
        }
    }
    Ok(())
}

/// Mask all but the first few characters of a token.
fn mask(token: &str) -> String {
    let count = token.chars().count();
    if count <= PREVIEW_LEN {
        "*".repeat(count)
    } else {
        let prefix: String = token.chars().take(PREVIEW_LEN).collect();
        format!("{prefix}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_keeps_a_short_prefix() {
        assert_eq!(mask("0123456789abcdefghij"), "0123456789ab...");
    }

    #[test]
    fn short_tokens_fully_masked() {
        assert_eq!(mask("abc"), "***");
    }

    #[test]
    fn multibyte_tokens_mask_on_char_boundaries() {
        assert_eq!(mask("ありがとうございます"), "**********");
        assert_eq!(mask("ああああああああああああああ"), "ああああああああああああ...");
    }
}
