//! Filling in the generation form from flags or interactively

use crate::cli::style::{Stylize, locked, notice};
use anstream::{eprintln, println};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use reelgen::constraints::{Field, FieldLocks, FieldUpdate, FormState, Notice};
use reelgen::error::{Error, Result};
use reelgen::types::{
    AspectRatio, DurationSeconds, GenerationRequest, MAX_REFERENCE_IMAGES, MediaFile, Resolution,
};
use std::path::{Path, PathBuf};

/// Values collected from `generate` flags
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    /// Prompt text
    pub prompt: Option<String>,
    /// Negative prompt
    pub negative_prompt: Option<String>,
    /// Requested aspect ratio
    pub aspect_ratio: Option<AspectRatio>,
    /// Requested resolution
    pub resolution: Option<Resolution>,
    /// Requested duration
    pub duration: Option<DurationSeconds>,
    /// Initial image path
    pub image: Option<PathBuf>,
    /// Reference image paths
    pub references: Vec<PathBuf>,
    /// Input video path
    pub video: Option<PathBuf>,
    /// Last frame path
    pub last_frame: Option<PathBuf>,
    /// Extend the service's last video
    pub extend_last: bool,
    /// Model override
    pub model: Option<String>,
}

async fn load_optional(path: Option<&Path>) -> Result<Option<MediaFile>> {
    match path {
        Some(path) => Ok(Some(MediaFile::load(path).await?)),
        None => Ok(None),
    }
}

async fn load_all(paths: &[PathBuf]) -> Result<Vec<MediaFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(MediaFile::load(path).await?);
    }
    Ok(files)
}

/// Apply flag values to a fresh form, top to bottom
pub async fn form_from_input(input: &FormInput) -> Result<(FormState, Vec<Notice>)> {
    let mut updates = vec![
        FieldUpdate::Prompt(input.prompt.clone().unwrap_or_default()),
        FieldUpdate::NegativePrompt(input.negative_prompt.clone()),
        FieldUpdate::Model(input.model.clone()),
    ];
    updates.extend(input.aspect_ratio.map(FieldUpdate::AspectRatio));
    updates.extend(input.resolution.map(FieldUpdate::Resolution));
    updates.extend(input.duration.map(FieldUpdate::Duration));
    updates.push(FieldUpdate::InitialImage(
        load_optional(input.image.as_deref()).await?,
    ));
    if !input.references.is_empty() {
        updates.push(FieldUpdate::ReferenceImages(load_all(&input.references).await?));
    }
    updates.push(FieldUpdate::InputVideo(
        load_optional(input.video.as_deref()).await?,
    ));
    updates.push(FieldUpdate::LastFrame(
        load_optional(input.last_frame.as_deref()).await?,
    ));
    updates.push(FieldUpdate::ExtendLast(input.extend_last));

    Ok(FormState::new().apply_all(updates))
}

fn interactive_err(e: dialoguer::Error) -> Error {
    Error::Interactive(e.to_string())
}

fn ask_text(
    theme: &ColorfulTheme,
    prompt: &str,
    initial: Option<&str>,
    required: bool,
) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(!required);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }
    if required {
        input = input.validate_with(|text: &String| -> std::result::Result<(), &str> {
            if text.trim().is_empty() {
                Err("required")
            } else {
                Ok(())
            }
        });
    }
    input.interact_text().map_err(interactive_err)
}

fn split_paths(text: &str) -> Vec<PathBuf> {
    text.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Pick a setting value, or show it read-only when another field forces it
fn ask_setting<T: Copy + PartialEq>(
    theme: &ColorfulTheme,
    label: &str,
    field: Field,
    locks: &FieldLocks,
    options: &[T],
    current: T,
    render: impl Fn(T) -> String,
) -> Result<Option<T>> {
    if let Some(lock) = locks.get(field) {
        println!(
            "{} {}: {} {}",
            locked(),
            label,
            lock.value.accent(),
            format!("({})", lock.reason).muted()
        );
        return Ok(None);
    }

    let items: Vec<String> = options.iter().map(|o| render(*o)).collect();
    let default = options.iter().position(|o| *o == current).unwrap_or(0);
    let index = Select::with_theme(theme)
        .with_prompt(label)
        .items(&items)
        .default(default)
        .interact()
        .map_err(interactive_err)?;
    Ok(Some(options[index]))
}

/// Load the file named by an optional path answer and apply it
async fn apply_upload_answer(
    state: FormState,
    answer: &str,
    update: fn(Option<MediaFile>) -> FieldUpdate,
) -> Result<FormState> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(state);
    }
    let file = MediaFile::load(Path::new(answer)).await?;
    let state = state.apply(update(Some(file)));
    print_notices(state.notices());
    Ok(state)
}

/// Walk the user through the form, starting from flag values
///
/// Uploads are asked first so that forced settings show up as read-only.
/// Notices are printed as they happen.
pub async fn interactive_form(input: &FormInput) -> Result<FormState> {
    let theme = ColorfulTheme::default();
    let (mut state, notices) = form_from_input(input).await?;
    print_notices(&notices);

    let prompt = ask_text(&theme, "Prompt", input.prompt.as_deref(), true)?;
    state = state.apply(FieldUpdate::Prompt(prompt));

    let negative = ask_text(
        &theme,
        "Negative prompt (optional)",
        input.negative_prompt.as_deref(),
        false,
    )?;
    state = state.apply(FieldUpdate::NegativePrompt(Some(negative)));

    let image = ask_text(&theme, "Initial image path (optional)", None, false)?;
    state = apply_upload_answer(state, &image, FieldUpdate::InitialImage).await?;

    loop {
        let refs = ask_text(
            &theme,
            "Reference image paths, comma separated (optional, max 3)",
            None,
            false,
        )?;
        let paths = split_paths(&refs);
        if paths.is_empty() {
            break;
        }
        state = state.apply(FieldUpdate::ReferenceImages(load_all(&paths).await?));
        print_notices(state.notices());
        if !state.request().reference_images.is_empty() {
            break;
        }
    }

    let video = ask_text(&theme, "Input video path to extend (optional)", None, false)?;
    state = apply_upload_answer(state, &video, FieldUpdate::InputVideo).await?;

    let frame = ask_text(
        &theme,
        "Last frame image path to interpolate towards (optional)",
        None,
        false,
    )?;
    state = apply_upload_answer(state, &frame, FieldUpdate::LastFrame).await?;

    if state.request().input_video.is_none() {
        let extend = Confirm::with_theme(&theme)
            .with_prompt("Extend the last generated video?")
            .default(input.extend_last)
            .interact()
            .map_err(interactive_err)?;
        state = state.apply(FieldUpdate::ExtendLast(extend));
        print_notices(state.notices());
    }

    let current = state.request().clone();
    if let Some(value) = ask_setting(
        &theme,
        "Aspect ratio",
        Field::AspectRatio,
        &state.locks(),
        &AspectRatio::ALL,
        current.aspect_ratio,
        |v| v.label().to_string(),
    )? {
        state = state.apply(FieldUpdate::AspectRatio(value));
    }

    if let Some(value) = ask_setting(
        &theme,
        "Resolution",
        Field::Resolution,
        &state.locks(),
        &Resolution::ALL,
        current.resolution,
        |v| v.to_string(),
    )? {
        state = state.apply(FieldUpdate::Resolution(value));
        print_notices(state.notices());
    }

    let duration_now = state.request().duration;
    if let Some(value) = ask_setting(
        &theme,
        "Duration",
        Field::Duration,
        &state.locks(),
        &DurationSeconds::ALL,
        duration_now,
        |v| format!("{v} seconds"),
    )? {
        state = state.apply(FieldUpdate::Duration(value));
    }

    Ok(state)
}

/// Fail when flags selected more reference images than the service accepts
///
/// The form discards an over-limit selection; coming from flags that is an
/// error rather than a request without references.
pub fn reject_discarded_references(notices: &[Notice]) -> Result<()> {
    match notices.iter().find_map(|n| match n {
        Notice::ReferenceImagesRejected { selected } => Some(*selected),
        _ => None,
    }) {
        Some(selected) => Err(Error::TooManyReferenceImages {
            selected,
            max: MAX_REFERENCE_IMAGES,
        }),
        None => Ok(()),
    }
}

/// Ask before sending
pub fn confirm_submit() -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Generate this video?")
        .default(true)
        .interact()
        .map_err(interactive_err)
}

/// Print constraint notices to stderr
pub fn print_notices(notices: &[Notice]) {
    for n in notices {
        eprintln!("{} {}", notice(), n.to_string().warn());
    }
}

/// Print the request as it will be sent
pub fn print_request(request: &GenerationRequest, locks: &FieldLocks) {
    let marker = |field: Field| {
        locks
            .get(field)
            .map(|lock| format!(" {} {}", locked(), lock.reason.muted()))
            .unwrap_or_default()
    };

    println!("{}", "Video request".emphasis());
    println!("  Prompt:       {}", request.prompt);
    if let Some(negative) = &request.negative_prompt {
        println!("  Avoid:        {negative}");
    }
    println!(
        "  Aspect ratio: {}{}",
        request.aspect_ratio.accent(),
        marker(Field::AspectRatio)
    );
    println!(
        "  Resolution:   {}{}",
        request.resolution.accent(),
        marker(Field::Resolution)
    );
    println!(
        "  Duration:     {}{}",
        format!("{}s", request.duration).accent(),
        marker(Field::Duration)
    );
    if let Some(image) = &request.initial_image {
        println!("  Image:        {}", image.file_name);
    }
    for reference in &request.reference_images {
        println!("  Reference:    {}", reference.file_name);
    }
    if let Some(video) = &request.input_video {
        println!("  Extend:       {}", video.file_name);
    }
    if request.extend_last {
        println!("  Extend:       {}", "last generated video".muted());
    }
    if let Some(frame) = &request.last_frame {
        println!("  Last frame:   {}", frame.file_name);
    }
    println!();
}
