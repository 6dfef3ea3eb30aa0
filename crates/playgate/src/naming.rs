// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical names for playlist files and upstream locations.
//!
//! The proxy's trial filename and the cleanup path's artifact location both
//! come from [`trial_filename`], so a served trial always names the file that
//! cleanup later removes.

/// Replace characters that cannot appear in a quoted header filename.
fn sanitize(phone: &str) -> String {
    phone
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '_') { c } else { '_' })
        .collect()
}

/// Filename of a client's trial playlist.
pub fn trial_filename(phone: &str) -> String {
    format!("test_playlist_{}.m3u8", sanitize(phone))
}

/// Filename of a client's full playlist.
pub fn full_filename(phone: &str) -> String {
    format!("iptv_playlist_{}.m3u", sanitize(phone))
}

/// Repository path of a client's provisioned trial artifact.
pub fn trial_artifact_path(dir: &str, phone: &str) -> String {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        trial_filename(phone)
    } else {
        format!("{dir}/{}", trial_filename(phone))
    }
}

/// Upstream location of a client's full playlist.
pub fn full_playlist_url(base_url: &str, phone: &str) -> String {
    format!("{base_url}{phone}.m3u")
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
