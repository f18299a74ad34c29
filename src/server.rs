use crate::config::Config;
use crate::crop::CropRegion;
use crate::engine::{PageSegMode, TextRecognizer};
use crate::engines;
use crate::engines::tesseract::TesseractCli;
use crate::error::AppError;
use crate::format;
use crate::preprocessing::{FilterSelection, Pipeline};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use image::DynamicImage;
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Upload types the file surface accepts
const ACCEPTED_UPLOAD_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// Aspect ratio choices offered to the cropping widget
const ASPECT_RATIOS: [&str; 5] = ["1:1", "16:9", "4:3", "2:3", "free"];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// None when no Tesseract executable was found at startup;
    /// recognition stays disabled for the process lifetime.
    pub engine: Option<Arc<dyn TextRecognizer>>,
    pub config: Arc<Config>,
}

/// Recognition response
#[derive(Serialize)]
pub struct ExtractResponse {
    pub text: String,
    pub html: String,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response, enough for the UI to populate its controls
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub ocr_available: bool,
    pub engine: Option<String>,
    pub accepted_upload_types: Vec<String>,
    pub page_segmentation_modes: Vec<u8>,
    pub aspect_ratios: Vec<String>,
    pub max_upload_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = engines::locate_tesseract(config.tesseract_cmd.as_deref())
        .map(|path| Arc::new(TesseractCli::new(path)) as Arc<dyn TextRecognizer>);

    if engine.is_none() {
        tracing::error!(
            "Tesseract executable not found. Ensure Tesseract-OCR is installed \
             or set {}; recognition endpoints stay disabled.",
            engines::TESSERACT_CMD_VAR
        );
    }

    let addr = format!("{}:{}", config.host, config.port);
    let max_upload_size = config.max_upload_size;

    let state = AppState {
        engine,
        config: Arc::new(config),
    };

    let app = router(state, max_upload_size);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState, max_upload_size: usize) -> Router {
    Router::new()
        .route("/preprocess", post(handle_preprocess))
        .route("/extract", post(handle_extract))
        .route("/extract/text", post(handle_extract_text))
        .route("/extract/html", post(handle_extract_html))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Everything one interaction posts: the uploaded image plus the
/// current control values.
struct ExtractRequest {
    image: DynamicImage,
    selection: FilterSelection,
    crop: Option<CropRegion>,
    psm: PageSegMode,
}

impl ExtractRequest {
    /// Preprocess the uploaded image, then cut out the selected
    /// region of the processed result.
    fn processed_image(&self) -> Result<DynamicImage, AppError> {
        let result = Pipeline::new(self.selection).process(&self.image)?;
        match &self.crop {
            Some(region) => region.apply(&result.image),
            None => Ok(result.image),
        }
    }
}

async fn parse_request(mut multipart: Multipart, max_size: usize) -> Result<ExtractRequest, AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut selection = FilterSelection::none();
    let mut crop: Option<CropRegion> = None;
    let mut psm = PageSegMode::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?);
            }
            "contrast" => selection.contrast = parse_flag(&text_field(field).await?)?,
            "grayscale" => selection.grayscale = parse_flag(&text_field(field).await?)?,
            "threshold" => selection.threshold = parse_flag(&text_field(field).await?)?,
            "blur" => selection.blur = parse_flag(&text_field(field).await?)?,
            "crop" => {
                let value = text_field(field).await?;
                crop = Some(serde_json::from_str(&value).map_err(|e| {
                    AppError::InvalidRequest(format!("Invalid crop region: {}", e))
                })?);
            }
            "psm" => {
                let value = text_field(field).await?;
                let number: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| AppError::InvalidRequest(format!("Invalid psm: {}", value)))?;
                psm = PageSegMode::from_number(number).ok_or_else(|| {
                    AppError::InvalidRequest(format!("Unsupported psm: {}", number))
                })?;
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = file_data.ok_or(AppError::MissingFile)?;

    if data.len() > max_size {
        return Err(AppError::ImageTooLarge {
            size: data.len(),
            max: max_size,
        });
    }

    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    if !ACCEPTED_UPLOAD_TYPES.contains(&mime.as_str()) {
        return Err(AppError::UnsupportedUpload(mime));
    }

    let image = image::load_from_memory(&data)
        .map_err(|e| AppError::InvalidRequest(format!("Failed to decode image: {}", e)))?;

    Ok(ExtractRequest {
        image,
        selection,
        crop,
        psm,
    })
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Invalid field {}: {}", name, e)))
}

fn parse_flag(value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "off" | "no" => Ok(false),
        "1" | "true" | "on" | "yes" => Ok(true),
        other => Err(AppError::InvalidRequest(format!(
            "Invalid boolean flag: {}",
            other
        ))),
    }
}

/// Run preprocessing, cropping and recognition for one request.
fn recognize(state: &AppState, request: &ExtractRequest) -> Result<String, AppError> {
    let engine = state.engine.as_ref().ok_or_else(|| {
        AppError::EngineUnavailable(
            "Tesseract executable not found. Ensure Tesseract-OCR is installed.".to_string(),
        )
    })?;

    let image = request.processed_image()?;
    engine.recognize(&image, request.psm)
}

/// Preview surface: the preprocessed (and optionally cropped) image
/// as PNG, for side-by-side display in the UI.
async fn handle_preprocess(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_request(multipart, state.config.max_upload_size).await?;
    let image = request.processed_image()?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| AppError::Internal(format!("Failed to encode preview: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Recognize text and return it together with the HTML rendering.
async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let start = Instant::now();

    let request = parse_request(multipart, state.config.max_upload_size).await?;
    let text = recognize(&state, &request)?;
    let html = format::to_html(&text);

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Extraction completed in {}ms, psm {}, {} paragraph(s), text length: {}",
        processing_time_ms,
        request.psm.as_number(),
        format::count_paragraphs(&text),
        text.len()
    );

    Ok(Json(ExtractResponse {
        text,
        html,
        processing_time_ms,
    }))
}

/// Download surface: recognized text as a plain-text attachment.
async fn handle_extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_request(multipart, state.config.max_upload_size).await?;
    let text = recognize(&state, &request)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"extracted_text.txt\"",
            ),
        ],
        text,
    ))
}

/// Download surface: the HTML rendering as an attachment.
async fn handle_extract_html(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let request = parse_request(multipart, state.config.max_upload_size).await?;
    let text = recognize(&state, &request)?;
    let html = format::to_html(&text);

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"extracted_output.html\"",
            ),
        ],
        html,
    ))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr_available: state.engine.is_some(),
        engine: state.engine.as_ref().map(|e| e.name().to_string()),
        accepted_upload_types: ACCEPTED_UPLOAD_TYPES.iter().map(|s| s.to_string()).collect(),
        page_segmentation_modes: PageSegMode::all().iter().map(|m| m.as_number()).collect(),
        aspect_ratios: ASPECT_RATIOS.iter().map(|s| s.to_string()).collect(),
        max_upload_size_bytes: state.config.max_upload_size,
    })
}
