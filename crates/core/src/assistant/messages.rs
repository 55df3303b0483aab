//! User-facing texts for `/ia`.

use super::error::AssistantError;

const USAGE: &str = "❌ Por favor, envie uma pergunta!\n\n\
     Exemplo: /ia Qual é a capital do Brasil?";

const NOT_CONFIGURED: &str = "⚠️ O assistente de IA não está configurado.\n\n\
     Defina a variável OPENAI_API_KEY e reinicie o bot.";

pub(super) fn for_error(error: &AssistantError) -> String {
    match error {
        AssistantError::Usage => USAGE.to_string(),
        AssistantError::NotConfigured => NOT_CONFIGURED.to_string(),
        AssistantError::Upstream(e) => format!(
            "❌ Erro ao consultar a IA: {e}\n\n\
             Verifique se a chave da API (OPENAI_API_KEY) está correta e possui créditos."
        ),
        AssistantError::Delivery(_) => "❌ Não foi possível enviar a resposta.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;

    #[test]
    fn test_upstream_text_carries_cause_and_hint() {
        let text = for_error(&AssistantError::Upstream(LlmError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        }));
        assert!(text.contains("Incorrect API key provided"));
        assert!(text.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_usage_text_shows_example() {
        assert!(for_error(&AssistantError::Usage).contains("/ia"));
    }
}
