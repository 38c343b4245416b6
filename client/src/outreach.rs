//! Pastoral outreach drafting.
//!
//! Asks the Gemini `generateContent` API for a short check-in message and
//! falls back to a locally assembled template whenever that fails.

use std::env;
use std::time::Duration;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absence assumed when the caller has no better figure.
pub const DEFAULT_DAYS_ABSENT: u32 = 21;

const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 250;

/// Language of drafted messages and of the generation prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutreachLanguage {
    English,
    #[default]
    Swahili,
}

impl OutreachLanguage {
    /// Accepts `en`/`english` and `sw`/`swahili`/`kiswahili`, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "sw" | "swahili" | "kiswahili" => Some(Self::Swahili),
            _ => None,
        }
    }

    fn greetings(self) -> &'static [&'static str; 3] {
        match self {
            Self::English => &["Dear", "Hello", "Greetings in Christ,"],
            Self::Swahili => &["Mpendwa", "Habari", "Bwana asifiwe"],
        }
    }

    fn openers(self) -> &'static [&'static str; 3] {
        match self {
            Self::English => &[
                "we have missed you at our recent services.",
                "we noticed you have not been with us for the last few weeks.",
                "your presence has been missed in our gatherings.",
            ],
            Self::Swahili => &[
                "tumekukosa katika ibada zetu za hivi karibuni.",
                "tumeona hukuhudhuria ibada kwa Jumapili chache zilizopita.",
                "uwepo wako umekosekana katika mikutano yetu.",
            ],
        }
    }

    fn closings(self) -> &'static [&'static str; 3] {
        match self {
            Self::English => &[
                "We hope to see you soon!",
                "We are praying for you.",
                "Let us know if there is anything we can do to help.",
            ],
            Self::Swahili => &[
                "Tunatumai kukuona hivi karibuni!",
                "Tunakuombea.",
                "Tujulishe ikiwa kuna chochote tunaweza kukusaidia.",
            ],
        }
    }

    fn prompt(self, name: &str, days_absent: u32) -> String {
        match self {
            Self::English => format!(
                "Write a short, warm and encouraging email to a church member named {} who has \
                 missed services for about {} days. Check in on them and let them know the church \
                 remembers them. Keep the tone pastoral and respectful.",
                name, days_absent
            ),
            Self::Swahili => format!(
                "Andika barua pepe fupi, yenye upendo na kutia moyo kwa mshiriki wa kanisa \
                 anayeitwa {} ambaye amekosa ibada kwa takriban siku {}. Lenga kumjulia hali na \
                 kumjulisha kuwa kanisa linamkumbuka. Weka lugha ya kichungaji na ya heshima. \
                 Ujumbe uwe kwa Kiswahili.",
                name, days_absent
            ),
        }
    }
}

/// Why a generated draft could not be used.
#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("No generation API key configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Generation API returned no text")]
    EmptyResponse,
}

/// Settings for the generation API.
#[derive(Debug, Clone)]
pub struct OutreachConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL of the API, without the `/v1beta` path
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout: u64,
    pub language: OutreachLanguage,
}

impl OutreachConfig {
    /// Read `GEMINI_API_KEY`, `GEMINI_MODEL`, `GEMINI_ENDPOINT` and
    /// `SHEPHERD_OUTREACH_LANGUAGE`, honouring `.env`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let get = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());

        let language = match get("SHEPHERD_OUTREACH_LANGUAGE") {
            Some(value) => OutreachLanguage::parse(&value).unwrap_or_else(|| {
                tracing::warn!("Unknown outreach language {:?}, using default", value);
                OutreachLanguage::default()
            }),
            None => OutreachLanguage::default(),
        };

        Self {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: get("GEMINI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            language,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_language(mut self, language: OutreachLanguage) -> Self {
        self.language = language;
        self
    }
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: 30,
            language: OutreachLanguage::default(),
        }
    }
}

// generateContent wire format

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Drafts check-in messages for absent members.
#[derive(Debug, Clone)]
pub struct OutreachDrafter {
    client: reqwest::Client,
    config: OutreachConfig,
}

impl OutreachDrafter {
    pub fn new(config: OutreachConfig) -> Result<Self, OutreachError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client, config })
    }

    /// A message addressed to `first_name`. Never empty: any failure of the
    /// generation API yields a template message instead.
    pub async fn draft(&self, first_name: &str, days_absent: u32) -> String {
        match self.generate(first_name, days_absent).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Outreach generation failed, using template: {}", e);
                fallback_message(first_name, self.config.language)
            }
        }
    }

    async fn generate(&self, first_name: &str, days_absent: u32) -> Result<String, OutreachError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(OutreachError::MissingApiKey)?;

        let prompt = self.config.language.prompt(first_name, days_absent);
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OutreachError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response.json().await?;
        body.text().ok_or(OutreachError::EmptyResponse)
    }
}

/// The first word of a full name, or the whole trimmed name.
pub fn first_name(full_name: &str) -> &str {
    let trimmed = full_name.trim();
    trimmed.split_whitespace().next().unwrap_or(trimmed)
}

/// A template message in `language` built from a random greeting, opener and closing.
pub fn fallback_message(name: &str, language: OutreachLanguage) -> String {
    let mut rng = rand::thread_rng();
    let greetings = language.greetings();
    let openers = language.openers();
    let closings = language.closings();
    let greeting = greetings.choose(&mut rng).copied().unwrap_or(greetings[0]);
    let opener = openers.choose(&mut rng).copied().unwrap_or(openers[0]);
    let closing = closings.choose(&mut rng).copied().unwrap_or(closings[0]);

    match language {
        OutreachLanguage::English => {
            let name = match name.trim() {
                "" => "friend",
                name => name,
            };
            format!(
                "{greeting} {name},\n\nWe hope this message finds you well. {opener} We just \
                 wanted to check in and make sure you are doing okay.\n\nYou are an important \
                 part of our community, and we would love to see you again when you are \
                 able.\n\n{closing}\n\nBlessings,\nThe Pastoral Team"
            )
        }
        OutreachLanguage::Swahili => {
            let name = match name.trim() {
                "" => "ndugu",
                name => name,
            };
            format!(
                "{greeting} {name},\n\nTunatumai barua hii inakukuta ukiwa mzima. {opener} \
                 Tulitaka tu kukujulia hali na kuhakikisha kuwa uko salama.\n\nWewe ni sehemu \
                 muhimu ya jamii yetu, na tungependa kukuona tena utakapoweza.\n\n{closing}\n\n\
                 Baraka,\nTimu ya Wachungaji"
            )
        }
    }
}
