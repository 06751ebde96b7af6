//! Release tag detection.

use crate::core::provider::{BuildSystem, CiProvider};
use crate::core::text::non_blank;

/// True when AppVeyor reports a tag build with a non-blank tag name.
///
/// Only AppVeyor carries tag metadata, and it is consulted whether or not
/// AppVeyor is the active provider. Other providers never yield a tag.
pub fn is_build_tagged(build_system: &BuildSystem) -> bool {
    build_system
        .app_veyor
        .tag()
        .is_some_and(|tag| tag.is_tag && non_blank(tag.name.as_deref()).is_some())
}
