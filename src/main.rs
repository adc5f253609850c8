use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};

// Module declarations
mod api;
mod config;
mod state;
mod ui;

use api::client::{self, ApiClient};
use state::data::ImageRecord;
use state::feed::{DisplayMode, FeedEvent, FeedState};

/// Main application state
struct StreamViewer {
    /// HTTP client, endpoints, and the page cursor
    client: ApiClient,
    /// The loading / error / content state machine
    feed: FeedState,
    /// One slot per record on the current page, filled as image bytes arrive
    thumbs: Vec<Option<image::Handle>>,
    /// Bumped whenever a new page lands; downloads started for an earlier
    /// page carry the old value and are dropped on arrival
    page_seq: u64,
    /// Grid columns per row, from configuration
    column_count: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "previous" button
    PreviousPage,
    /// User clicked the "next" button
    NextPage,
    /// A page fetch settled
    PageLoaded {
        offset: u64,
        result: Result<Vec<ImageRecord>, String>,
    },
    /// An image download settled; `None` means it failed and the cell keeps
    /// its placeholder
    ThumbnailLoaded {
        seq: u64,
        index: usize,
        handle: Option<image::Handle>,
    },
}

impl StreamViewer {
    /// Create a new instance of the application and kick off the first page
    fn new() -> (Self, Task<Message>) {
        // If this fails, we panic because the app cannot function without
        // knowing where the backend lives
        let config = config::Config::from_env()
            .expect("Invalid configuration. Check the API_* and S3_* environment variables.");
        let client = ApiClient::new(&config)
            .expect("Failed to initialize the HTTP client.");

        println!("🖼  Image Stream pointed at {}", client.endpoint());

        let mut viewer = StreamViewer {
            client,
            feed: FeedState::new(),
            thumbs: Vec::new(),
            page_seq: 0,
            column_count: config.column_count,
        };

        let first_page = viewer.request_page(viewer.client.next_offset());
        (viewer, first_page)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NextPage => {
                // Ignore clicks while a fetch is in flight
                if !self.feed.fetch_allowed() {
                    return Task::none();
                }
                self.request_page(self.client.next_offset())
            }
            Message::PreviousPage => {
                if !self.feed.fetch_allowed() {
                    return Task::none();
                }
                match self.client.prev_offset() {
                    Some(offset) => self.request_page(offset),
                    None => Task::none(),
                }
            }
            Message::PageLoaded { offset, result } => match result {
                Ok(records) => {
                    // The cursor only moves once a page actually arrives
                    self.client.commit(offset);
                    self.page_seq += 1;
                    self.thumbs = vec![None; records.len()];

                    println!("📥 Page at offset {}: {} images", offset, records.len());

                    let downloads = self.request_thumbnails(&records);
                    self.feed.apply(FeedEvent::FetchSucceeded(records));
                    downloads
                }
                Err(error) => {
                    eprintln!("❌ Page fetch failed: {}", error);
                    self.feed.apply(FeedEvent::FetchFailed(error));
                    Task::none()
                }
            },
            Message::ThumbnailLoaded { seq, index, handle } => {
                // Results for an abandoned page land here after the user
                // navigated away; they must not fill the wrong cell
                if seq == self.page_seq {
                    if let Some(slot) = self.thumbs.get_mut(index) {
                        *slot = handle;
                    }
                }
                Task::none()
            }
        }
    }

    /// Enter the loading state and fetch the page at `offset`
    fn request_page(&mut self, offset: u64) -> Task<Message> {
        self.feed.apply(FeedEvent::FetchStarted);

        let http = self.client.http();
        let endpoint = self.client.endpoint();
        let limit = self.client.page_size();

        Task::perform(
            async move {
                client::fetch_page(http, endpoint, offset, limit)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::PageLoaded { offset, result },
        )
    }

    /// Start one download task per record on the freshly loaded page
    fn request_thumbnails(&self, records: &[ImageRecord]) -> Task<Message> {
        let seq = self.page_seq;
        let mut downloads = Vec::new();

        for (index, record) in records.iter().enumerate() {
            let Some(url) = self.client.resolve_image_url(&record.s3_image_link) else {
                eprintln!("⚠️  Unresolvable image link: {}", record.s3_image_link);
                continue;
            };

            let http = self.client.http();
            downloads.push(Task::perform(
                async move { client::fetch_image(http, url).await },
                move |result| {
                    let handle = match result {
                        Ok(bytes) => Some(image::Handle::from_bytes(bytes)),
                        Err(error) => {
                            eprintln!("⚠️  Image download failed: {}", error);
                            None
                        }
                    };
                    Message::ThumbnailLoaded { seq, index, handle }
                },
            ));
        }

        Task::batch(downloads)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body = match self.feed.display() {
            DisplayMode::Loading => self.loading_view(),
            DisplayMode::Error(message) => self.error_view(message),
            DisplayMode::Content(records) => self.content_view(records),
        };

        column![
            self.nav_bar(),
            container(body)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(20),
        ]
        .into()
    }

    /// Static top bar: title and the single feed entry
    fn nav_bar(&self) -> Element<Message> {
        container(
            row![text("Image Stream").size(20), text("Stream").size(16)]
                .spacing(25)
                .align_y(Alignment::Center),
        )
        .width(Length::Fill)
        .padding(15)
        .into()
    }

    fn loading_view(&self) -> Element<Message> {
        container(text("Loading…").size(24))
            .center_x(Length::Fill)
            .padding(40)
            .into()
    }

    /// Error banner shown in place of the grid
    fn error_view<'a>(&'a self, message: &'a str) -> Element<'a, Message> {
        column![text("Ooops").size(28), text(message).size(16)]
            .spacing(10)
            .into()
    }

    /// The grid plus the previous/next button group
    fn content_view<'a>(&'a self, records: &'a [ImageRecord]) -> Element<'a, Message> {
        let grid = ui::grid::image_grid(records, &self.thumbs, self.column_count);

        let controls = row![
            button(text("Previous"))
                .on_press_maybe(self.client.prev_offset().map(|_| Message::PreviousPage))
                .width(Length::Fill)
                .padding(10),
            button(text("Next"))
                .on_press(Message::NextPage)
                .width(Length::Fill)
                .padding(10),
        ]
        .spacing(10);

        column![scrollable(grid).height(Length::Fill), controls]
            .spacing(20)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Image Stream",
        StreamViewer::update,
        StreamViewer::view,
    )
    .theme(StreamViewer::theme)
    .centered()
    .run_with(StreamViewer::new)
}
