//! Coach IA: a thin Gemini wrapper that can never fail. Every failure
//! mode degrades to a fixed Spanish tip instead of surfacing an error.

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::types::WorkoutLog;

const GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const FALLBACK_NO_KEY: &str =
    "El Coach IA está preparando tu plan de hoy. ¡Asegúrate de registrar tus series!";
pub const FALLBACK_NO_HISTORY: &str =
    "¡Bienvenido a FORJA! Completa tu primer entrenamiento para que pueda analizar tu rendimiento y darte consejos técnicos.";
pub const FALLBACK_EMPTY_REPLY: &str = "¡Buen ritmo! Mantén la técnica y la intensidad alta.";
pub const FALLBACK_ERROR: &str =
    "Enfócate en la sobrecarga progresiva esta semana. ¡Vas por buen camino!";

/// Summarize the three most recent logs into the advice prompt.
pub fn build_prompt(logs: &[WorkoutLog]) -> String {
    let summary: Vec<String> = logs
        .iter()
        .take(3)
        .map(|l| format!("{} ({} ejercicios)", l.routine_name, l.exercises.len()))
        .collect();
    format!(
        "Analiza este breve historial: {}. Dame un consejo de 15 palabras máximo en español. \
         Usa términos como RPE, volumen o sobrecarga. Sé motivador.",
        summary.join(", ")
    )
}

/// Fetch a short tip for the given history. Missing key, empty history,
/// transport errors, non-2xx responses and empty bodies each map to a
/// fixed fallback string.
pub async fn fetch_advice(logs: &[WorkoutLog]) -> String {
    let key = match option_env!("FORJA_GEMINI_KEY") {
        Some(k) if !k.is_empty() => k,
        _ => return FALLBACK_NO_KEY.to_string(),
    };
    if logs.is_empty() {
        return FALLBACK_NO_HISTORY.to_string();
    }

    match request_advice(key, &build_prompt(logs)).await {
        Ok(Some(text)) => text,
        Ok(None) => FALLBACK_EMPTY_REPLY.to_string(),
        Err(e) => {
            web_sys::console::log_1(&format!("Coach IA unavailable: {:?}", e).into());
            FALLBACK_ERROR.to_string()
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

async fn request_advice(key: &str, prompt: &str) -> Result<Option<String>, JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    })
    .to_string();

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    opts.set_headers(&JsValue::from(&headers));

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        GEMINI_MODEL, key
    );
    let request = Request::new_with_str_and_init(&url, &opts)?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;
    if !resp.ok() {
        return Err(format!("HTTP error: {}", resp.status()).into());
    }

    let json = JsFuture::from(resp.json()?).await?;
    let reply: GenerateResponse = serde_wasm_bindgen::from_value(json)?;

    let text = reply
        .candidates
        .into_iter()
        .flat_map(|c| c.content.parts)
        .map(|p| p.text.trim().to_string())
        .find(|t| !t.is_empty());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LogEntry, WorkoutLog};

    fn log(routine: &str, entries: usize) -> WorkoutLog {
        WorkoutLog {
            id: "log".into(),
            user_id: "u-1".into(),
            user_name: "Marta".into(),
            date: "2026-08-25".into(),
            routine_id: "rt".into(),
            routine_name: routine.into(),
            exercises: vec![
                LogEntry {
                    name: "Press banca".into(),
                    weight: 50.0,
                    sets_completed: 3,
                    total_reps: 30,
                    was_successful: true,
                };
                entries
            ],
        }
    }

    #[test]
    fn prompt_summarizes_at_most_three_logs() {
        let logs = vec![log("Empuje", 4), log("Pierna", 5), log("Espalda", 3), log("Full", 6)];
        let prompt = build_prompt(&logs);
        assert!(prompt.contains("Empuje (4 ejercicios)"));
        assert!(prompt.contains("Espalda (3 ejercicios)"));
        assert!(!prompt.contains("Full"));
    }

    #[test]
    fn fallbacks_are_distinct_and_non_empty() {
        let all = [
            FALLBACK_NO_KEY,
            FALLBACK_NO_HISTORY,
            FALLBACK_EMPTY_REPLY,
            FALLBACK_ERROR,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
