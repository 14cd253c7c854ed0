use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use iced::keyboard;
use iced::widget::image::Handle;
use iced::widget::{canvas, column, container, image as iced_image, mouse_area, row, text};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use image::DynamicImage;

mod geometry;
mod naming;
mod persist;
mod scan;
mod state;
mod ui;

use geometry::ZOOM_STEP;
use scan::ImageTask;
use state::queue::ImageQueue;
use state::session::{ClickOutcome, ProposalSlot, Selection, Session, SessionPhase};
use ui::canvas::CropCanvas;

/// Interactive batch cropping viewer
///
/// Walks every PNG in the input folder, lets the operator pick up to two
/// center-biased crops per image, and writes the chosen variant into the
/// output folder. Images already represented in the output folder are
/// skipped, so re-running the tool continues where it left off.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Source folder scanned for PNG images (non-recursive)
    #[arg(short = 'i', long = "input_dir", default_value = "input")]
    input_dir: PathBuf,

    /// Destination folder for confirmed crops
    #[arg(short = 'o', long = "output_dir", default_value = "output")]
    output_dir: PathBuf,
}

/// Main application state
struct CropViewer {
    /// Pending images plus the back-navigation history
    queue: ImageQueue,
    /// Where confirmed variants are written
    output_dir: PathBuf,
    /// Decoded source image currently on screen
    image: Option<Arc<DynamicImage>>,
    /// Crop session state machine for the current image
    session: Option<Session>,
    /// Display handle for the source image
    source_handle: Option<Handle>,
    /// Live preview of the rectangle under edit
    live_preview: Option<Handle>,
    /// Frozen preview of proposal 1 (clickable to save that variant)
    first_preview: Option<Handle>,
    /// Frozen preview of proposal 2
    second_preview: Option<Handle>,
    /// Status line shown to the operator
    status: String,
}

/// Application messages (events)
///
/// Every input — pointer, clicks, wheel, keys, finished background loads —
/// arrives here and is applied to the session state one message at a time.
#[derive(Debug, Clone)]
enum Message {
    /// Background decode of the current image completed
    ImageLoaded(Result<Arc<DynamicImage>, String>),
    /// Pointer moved over the editing surface (image coordinates)
    PointerMoved(i32, i32),
    /// Left click on the editing surface
    PrimaryClicked,
    /// Right click on the editing surface: go back one image
    SecondaryClicked,
    /// Click on one of the proposal preview surfaces
    VariantClicked(ProposalSlot),
    /// Zoom stepped via the z/x keys or the wheel
    ZoomAdjusted(f32),
    /// 'q' pressed
    Quit,
}

impl CropViewer {
    fn new(tasks: Vec<ImageTask>, output_dir: PathBuf) -> (Self, Task<Message>) {
        let mut viewer = CropViewer {
            queue: ImageQueue::new(tasks),
            output_dir,
            image: None,
            session: None,
            source_handle: None,
            live_preview: None,
            first_preview: None,
            second_preview: None,
            status: String::from("Loading..."),
        };

        let task = viewer.load_current();
        (viewer, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImageLoaded(Ok(image)) => {
                let name = self
                    .queue
                    .current()
                    .map(|t| t.file_name.clone())
                    .unwrap_or_default();

                self.session = Some(Session::new(image.width(), image.height()));
                self.source_handle = Some(to_handle(&image));
                self.first_preview = None;
                self.second_preview = None;
                self.image = Some(image);
                self.refresh_preview();

                self.status = format!(
                    "[{}/{}] {} — position the first crop, z/x or wheel to zoom",
                    self.queue.position() + 1,
                    self.queue.len(),
                    name
                );
                Task::none()
            }

            Message::ImageLoaded(Err(error)) => {
                // One unreadable file never aborts the batch
                eprintln!("⚠️  {}", error);
                self.advance()
            }

            Message::PointerMoved(x, y) => {
                if let Some(session) = self.session.as_mut() {
                    session.pointer_moved(x, y);
                }
                self.refresh_preview();
                Task::none()
            }

            Message::ZoomAdjusted(delta) => {
                if let Some(session) = self.session.as_mut() {
                    session.adjust_zoom(delta);
                }
                self.refresh_preview();
                Task::none()
            }

            Message::PrimaryClicked => {
                let outcome = match self.session.as_mut() {
                    Some(session) => session.primary_click(),
                    None => return Task::none(),
                };

                match outcome {
                    ClickOutcome::FrozeFirst => {
                        // The live preview still shows the first crop; keep it
                        self.first_preview = self.live_preview.clone();
                        self.refresh_preview();
                        self.status =
                            String::from("position the second crop, then click to confirm");
                        Task::none()
                    }
                    ClickOutcome::FrozeSecond => {
                        self.second_preview = self.live_preview.clone();
                        self.status = String::from(
                            "click a crop preview to save it, or the image to keep the original",
                        );
                        Task::none()
                    }
                    ClickOutcome::SaveOriginal => self.persist_and_advance(Selection::Original),
                }
            }

            Message::VariantClicked(slot) => {
                let selection = match self.session.as_ref() {
                    Some(session) => session.select_variant(slot),
                    None => return Task::none(),
                };
                self.persist_and_advance(selection)
            }

            Message::SecondaryClicked => {
                if self.queue.go_back() {
                    self.load_current()
                } else {
                    println!("⚠️  No previous image to go back to");
                    self.status = String::from("nothing to go back to");
                    Task::none()
                }
            }

            Message::Quit => {
                println!("👋 Stopped by the operator");
                iced::exit()
            }
        }
    }

    /// Write the chosen variant for the current image and move on.
    /// A failed save is logged and the queue still advances.
    fn persist_and_advance(&mut self, selection: Selection) -> Task<Message> {
        if let (Some(task), Some(image), Some(session)) = (
            self.queue.current(),
            self.image.as_ref(),
            self.session.as_ref(),
        ) {
            if let Err(error) =
                persist::persist(task, image, &session.proposals, selection, &self.output_dir)
            {
                eprintln!("⚠️  Failed to save {}: {}", task.file_name, error);
            }
        }

        self.advance()
    }

    fn advance(&mut self) -> Task<Message> {
        self.queue.advance();
        self.load_current()
    }

    /// Kick off a background decode of the current queue entry, or close
    /// the window when the queue is exhausted.
    fn load_current(&mut self) -> Task<Message> {
        // Nothing is editable until the decode completes
        self.session = None;
        self.image = None;
        self.live_preview = None;

        match self.queue.current() {
            Some(task) => {
                println!(
                    "[{}/{}] processing {}...",
                    self.queue.position() + 1,
                    self.queue.len(),
                    task.file_name
                );
                self.status = format!("loading {}...", task.file_name);
                Task::perform(load_image_async(task.path.clone()), Message::ImageLoaded)
            }
            None => {
                println!("✅ All images processed");
                iced::exit()
            }
        }
    }

    /// Regenerate the live preview from the active rectangle. Skipped while
    /// confirming: both previews are frozen at that point.
    fn refresh_preview(&mut self) {
        let (Some(image), Some(session)) = (self.image.as_ref(), self.session.as_ref()) else {
            return;
        };
        if session.phase() == SessionPhase::Confirming {
            return;
        }

        let preview = geometry::render_preview(image, session.active_rect());
        self.live_preview = Some(to_handle(&preview));
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let (Some(session), Some(source), Some(image)) = (
            self.session.as_ref(),
            self.source_handle.as_ref(),
            self.image.as_ref(),
        ) else {
            return container(text(&self.status).size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        };

        let width = image.width() as f32;
        let height = image.height() as f32;

        // Source image with the crop rectangle overlay on top; the canvas
        // is sized 1:1 with the image so pointer coordinates are pixel
        // coordinates.
        let editing = iced::widget::stack![
            iced_image(source.clone()).width(width).height(height),
            canvas(CropCanvas {
                rect: session.active_rect()
            })
            .width(width)
            .height(height),
        ];

        let live: Element<'_, Message> = match &self.live_preview {
            Some(handle) => iced_image(handle.clone()).width(width).height(height).into(),
            None => placeholder("preview", width, height),
        };

        let proposals = row![
            self.proposal_surface(ProposalSlot::First, &self.first_preview, "crop 1"),
            self.proposal_surface(ProposalSlot::Second, &self.second_preview, "crop 2"),
        ]
        .spacing(10);

        let content = column![
            row![editing, live].spacing(10),
            proposals,
            text(&self.status).size(16),
        ]
        .spacing(10)
        .padding(10)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// A clickable proposal preview. Empty slots are still clickable and
    /// fall back to saving the original.
    fn proposal_surface(
        &self,
        slot: ProposalSlot,
        handle: &Option<Handle>,
        label: &'static str,
    ) -> Element<'_, Message> {
        let width = self.image.as_ref().map(|i| i.width() as f32 / 2.0).unwrap_or(160.0);
        let height = self.image.as_ref().map(|i| i.height() as f32 / 2.0).unwrap_or(120.0);

        let inner: Element<'_, Message> = match handle {
            Some(handle) => iced_image(handle.clone()).width(width).height(height).into(),
            None => placeholder(label, width, height),
        };

        mouse_area(inner)
            .on_press(Message::VariantClicked(slot))
            .into()
    }

    /// Keyboard bindings: z/x step the zoom, q quits.
    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            keyboard::Key::Character("z") => Some(Message::ZoomAdjusted(ZOOM_STEP)),
            keyboard::Key::Character("x") => Some(Message::ZoomAdjusted(-ZOOM_STEP)),
            keyboard::Key::Character("q") => Some(Message::Quit),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Bordered box shown where a preview has not been generated yet.
fn placeholder(label: &'static str, width: f32, height: f32) -> Element<'static, Message> {
    container(text(label).size(14))
        .width(width)
        .height(height)
        .center_x(width)
        .center_y(height)
        .style(container::bordered_box)
        .into()
}

/// Convert a decoded image into a display handle for the image widget.
fn to_handle(image: &DynamicImage) -> Handle {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_rgba(width, height, rgba.into_raw())
}

/// Decode an image off the UI thread.
async fn load_image_async(path: PathBuf) -> Result<Arc<DynamicImage>, String> {
    tokio::task::spawn_blocking(move || {
        image::open(&path)
            .map(Arc::new)
            .map_err(|e| format!("failed to open {}: {}", path.display(), e))
    })
    .await
    .map_err(|e| format!("task join error: {}", e))?
}

fn main() -> iced::Result {
    let args = Args::parse();

    let tasks = match scan::compute_pending_queue(&args.input_dir, &args.output_dir) {
        Ok(tasks) => tasks,
        Err(error) => {
            eprintln!("❌ {}", error);
            return Ok(());
        }
    };

    if tasks.is_empty() {
        println!("✅ Every image is already processed.");
        return Ok(());
    }

    println!("🖼️  {} images to process", tasks.len());

    let output_dir = args.output_dir;
    iced::application("Batch Crop Viewer", CropViewer::update, CropViewer::view)
        .subscription(CropViewer::subscription)
        .theme(CropViewer::theme)
        .centered()
        .run_with(move || CropViewer::new(tasks, output_dir))
}
