//! User-facing texts for `/musicas`.

use super::error::PipelineError;
use super::types::{Stage, TrackDescriptor};

const EXAMPLE: &str = "Exemplo: /musicas Imagine Dragons - Believer";

/// Formats seconds as `m:ss`.
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn searching(query: &str) -> String {
    format!("🔍 Procurando por: {query}\n\n⏳ Aguarde, estou baixando a música...")
}

pub fn found(track: &TrackDescriptor) -> String {
    format!(
        "✅ Música encontrada!\n\n🎵 {}\n👤 {}\n⏱️ Duração: {}",
        track.title,
        track.author,
        format_duration(track.duration_secs)
    )
}

pub fn downloading(track: &TrackDescriptor) -> String {
    format!("{}\n\n⬇️ Baixando áudio...", found(track))
}

pub fn converting(track: &TrackDescriptor) -> String {
    format!("{}\n\n🎧 Convertendo para MP3...", found(track))
}

pub fn sending(track: &TrackDescriptor) -> String {
    format!("{}\n\n📤 Enviando arquivo...", found(track))
}

/// Caption attached to the delivered audio.
pub fn caption(track: &TrackDescriptor) -> String {
    format!("🎵 {}", track.title)
}

fn stage_name(stage: Stage) -> &'static str {
    match stage {
        Stage::Search => "pesquisa",
        Stage::Download => "download",
        Stage::Transcode => "conversão",
        Stage::Delivery => "envio",
    }
}

/// Text shown to the user for a failed run. Never includes internal detail.
pub fn error_text(error: &PipelineError) -> String {
    match error {
        PipelineError::Usage => {
            format!("❌ Por favor, forneça o nome da música!\n\n{EXAMPLE}")
        }
        PipelineError::NotFound { query } => format!(
            "❌ Nenhum resultado encontrado para: {query}\n\n\
             Tente novamente com outro nome ou termo de pesquisa."
        ),
        PipelineError::NoAudioStream { .. } => {
            "❌ Não encontrei uma faixa de áudio disponível para este vídeo.".to_string()
        }
        PipelineError::MediaUnavailable(_) => "❌ Este vídeo não está disponível \
             (removido, privado ou bloqueado na sua região)."
            .to_string(),
        PipelineError::ExtractionFormat(_) => "❌ Não consegui ler as informações deste vídeo.\n\n\
             Tente novamente mais tarde."
            .to_string(),
        PipelineError::Conversion(_) => {
            "❌ Erro ao processar o arquivo de áudio. Tente novamente.".to_string()
        }
        PipelineError::Delivery(_) => {
            "❌ Não foi possível enviar o arquivo de áudio. Tente novamente.".to_string()
        }
        PipelineError::Timeout { stage, .. } => format!(
            "⌛ A etapa de {} demorou demais e foi cancelada. Tente novamente.",
            stage_name(*stage)
        ),
        PipelineError::Unknown(detail) => format!(
            "❌ Erro ao baixar a música: {detail}\n\n\
             Por favor, tente novamente com outro nome ou termo de pesquisa."
        ),
    }
}
