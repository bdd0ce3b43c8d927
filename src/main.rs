use iced::widget::{button, column, container, scrollable, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Instant;

mod config;
mod media;
mod remote;
mod state;
mod ui;

use config::AppConfig;
use media::download::{self, DownloadError, DOWNLOAD_FILE_NAME};
use media::loader::{self, LoadError};
use remote::{RemoteClient, RemoteError};
use state::data::{format_size, RequestState, RequestTicket, SourceImage};
use state::{Session, SessionError};

/// Extensions offered by the open dialog (a hint, not validation)
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Main application state
struct BackgroundRemover {
    /// Upload/remove/download workflow
    session: Session,
    /// Client for the removal backend
    client: RemoteClient,
    /// When the in-flight request was sent
    started_at: Option<Instant>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Choose Image"
    PickImage,
    /// Background read of the picked file finished
    ImageLoaded(Result<SourceImage, LoadError>),
    /// User clicked "Remove Background"
    RemoveBackground,
    /// Backend answered (or the request failed)
    RemovalFinished(RequestTicket, Result<Vec<u8>, RemoteError>),
    /// User clicked "Download"
    Download,
    /// Save to disk finished
    DownloadFinished(Result<PathBuf, DownloadError>),
    /// Startup reachability check finished
    BackendChecked(Result<String, RemoteError>),
}

impl BackgroundRemover {
    /// Create a new instance of the application
    fn new(client: RemoteClient) -> (Self, Task<Message>) {
        let status = format!("Checking backend at {}...", client.base_url());

        let check_client = client.clone();
        let check = Task::perform(
            async move { check_client.welcome().await },
            Message::BackendChecked,
        );

        (
            BackgroundRemover {
                session: Session::new(),
                client,
                started_at: None,
                status,
            },
            check,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select an Image")
                    .add_filter("Image", &IMAGE_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => {
                        self.status = format!("Loading {}...", path.display());
                        Task::perform(loader::load_source(path), Message::ImageLoaded)
                    }
                    None => Task::none(),
                }
            }
            Message::ImageLoaded(Ok(source)) => {
                self.status = format!("Loaded {} ({})", source.file_name, format_size(source.len()));
                self.session.on_file_selected(Some(source));

                let previews = self.session.previews();
                tracing::debug!(
                    live = previews.live_count(),
                    issued = previews.issued(),
                    revoked = previews.revoked(),
                    "preview handles"
                );
                Task::none()
            }
            Message::ImageLoaded(Err(e)) => {
                tracing::warn!("{}", e);
                // a running request keeps its status line
                if !self.session.is_loading() {
                    self.status = "Ready.".to_string();
                }
                self.session.on_load_failed(e.to_string());
                Task::none()
            }
            Message::RemoveBackground => match self.session.on_request_started() {
                Ok((ticket, payload)) => {
                    self.status = format!("Removing background from {}...", payload.file_name);
                    self.started_at = Some(Instant::now());

                    let client = self.client.clone();
                    Task::perform(
                        async move { client.remove_background(payload).await },
                        move |result| Message::RemovalFinished(ticket, result),
                    )
                }
                Err(SessionError::NoImage) => {
                    self.status = "Ready.".to_string();
                    Task::none()
                }
                Err(SessionError::Busy) => Task::none(),
            },
            Message::RemovalFinished(ticket, result) => {
                let elapsed = self
                    .started_at
                    .take()
                    .map(|start| start.elapsed().as_secs_f32())
                    .unwrap_or_default();

                match result {
                    Ok(bytes) => {
                        let len = bytes.len();
                        if self.session.on_request_succeeded(ticket, bytes) {
                            self.status = format!("✅ Background removed in {:.1}s ({}).", elapsed, format_size(len));
                            tracing::info!(elapsed, len, "background removed");
                        } else {
                            self.status = "Ready.".to_string();
                        }
                    }
                    Err(e) => {
                        tracing::error!("background removal failed: {}", e);
                        self.status = "Ready.".to_string();
                        self.session.on_request_failed(ticket, e.user_message());
                    }
                }
                Task::none()
            }
            Message::Download => {
                let Some(target) = self.session.download_target() else {
                    return Task::none();
                };
                let bytes = target.shared_bytes();
                tracing::debug!(id = ?target.id(), "saving processed preview");

                // Show the native save dialog
                let dest = FileDialog::new()
                    .set_title("Save Image")
                    .set_file_name(DOWNLOAD_FILE_NAME)
                    .add_filter("PNG", &["png"])
                    .save_file();

                match dest {
                    Some(dest) => Task::perform(download::save_processed(bytes, dest), Message::DownloadFinished),
                    None => Task::none(),
                }
            }
            Message::DownloadFinished(Ok(path)) => {
                self.status = format!("💾 Saved to {}", path.display());
                Task::none()
            }
            Message::DownloadFinished(Err(e)) => {
                tracing::error!("{}", e);
                self.status = format!("⚠️  {}", e);
                Task::none()
            }
            Message::BackendChecked(Ok(welcome)) => {
                tracing::info!(backend = %self.client.base_url(), %welcome, "backend reachable");
                self.status = format!("Connected to {}: {}", self.client.base_url(), welcome);
                Task::none()
            }
            Message::BackendChecked(Err(e)) => {
                tracing::warn!(backend = %self.client.base_url(), "backend check failed: {}", e);
                self.status = format!("⚠️  Backend at {} did not answer: {}", self.client.base_url(), e.user_message());
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![
            text("Background Remover").size(32),
            button(text("Choose Image"))
                .on_press(Message::PickImage)
                .padding(10),
        ]
        .spacing(20)
        .padding(40)
        .max_width(900.0)
        .align_x(Alignment::Center);

        if let Some(preview) = self.session.original_preview() {
            let dimensions = self.session.source().and_then(|source| source.dimensions);
            content = content.push(ui::panels::image_panel("Original Image", preview, dimensions, None));
        }

        let label = match self.session.request_state() {
            RequestState::Loading => "Processing...",
            RequestState::Idle | RequestState::Error(_) => "Remove Background",
        };
        content = content.push(
            button(text(label))
                .on_press_maybe(self.session.can_remove().then_some(Message::RemoveBackground))
                .width(Length::Fill)
                .padding(10),
        );

        if let Some(error) = self.session.error() {
            content = content.push(ui::panels::error_line(error));
        }

        if let Some(preview) = self.session.processed_preview() {
            let dimensions = self.session.processed().and_then(|processed| processed.dimensions);
            let download = button(text("Download")).on_press(Message::Download).padding(8);
            content = content.push(ui::panels::image_panel(
                "Processed Image",
                preview,
                dimensions,
                Some(download.into()),
            ));
        }

        content = content.push(text(&self.status).size(14));

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // The app cannot do anything useful without a backend, so refuse to start
    let config = AppConfig::load().inspect_err(|e| tracing::error!("{}", e))?;
    let client = RemoteClient::new(config.backend_url)?;
    tracing::info!(backend = %client.base_url(), "🎨 Background Remover starting");

    iced::application(
        "Background Remover",
        BackgroundRemover::update,
        BackgroundRemover::view,
    )
    .theme(BackgroundRemover::theme)
    .centered()
    .run_with(move || BackgroundRemover::new(client))?;

    Ok(())
}
