// Copyright 2021 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Text cleaning
//! Pure string normalization applied to review text before aspect extraction and
//! sentiment scoring. Cleaning unescapes HTML entities, masks URLs and user mentions
//! with placeholder tokens, converts emoji to delimited text tags and collapses
//! whitespace. It holds no state and is idempotent on already-clean text.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Placeholder substituted for URLs.
pub const URL_TOKEN: &str = "[URL]";
/// Placeholder substituted for user mentions.
pub const USER_TOKEN: &str = "[USER]";

lazy_static! {
    static ref URL_PATTERN: Regex = Regex::new(r"http\S+|www\S+").unwrap();
    static ref MENTION_PATTERN: Regex = Regex::new(r"@\w+").unwrap();
    static ref WHITESPACE_PATTERN: Regex = Regex::new(r"\s+").unwrap();
}

/// Normalize raw review text for analysis.
///
/// The transformation steps run in a fixed order:
/// 1. HTML entities are decoded (`&amp;` becomes `&`).
/// 2. URLs are replaced with [`URL_TOKEN`].
/// 3. User mentions (`@handle`) are replaced with [`USER_TOKEN`].
/// 4. Emoji are replaced with their space-delimited names (`thumbs_up`).
/// 5. Whitespace runs are collapsed to single spaces and the result is trimmed.
pub fn clean_text(text: &str) -> String {
    let text = html_escape::decode_html_entities(text);
    let text = URL_PATTERN.replace_all(&text, URL_TOKEN);
    let text = MENTION_PATTERN.replace_all(&text, USER_TOKEN);
    let text = replace_emoji(&text);
    WHITESPACE_PATTERN.replace_all(&text, " ").trim().to_string()
}

/// Replaces each emoji grapheme cluster with its space-delimited, underscored name.
fn replace_emoji(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        match emojis::get(grapheme) {
            Some(emoji) => {
                output.push(' ');
                output.push_str(&emoji.name().replace(' ', "_"));
                output.push(' ');
            }
            None => output.push_str(grapheme),
        }
    }
    output
}
