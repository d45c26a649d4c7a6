//! Fixed instruction prompts sent alongside the uploaded image.
//!
//! The reply format requested here is what [`crate::parser::parse`] expects:
//! a `Description:` line, an optional `Main Caption:` line, then a `Captions:`
//! section with ten numbered options.

/// Prompt asking for an eight sentence description and ten numbered captions.
pub const CAPTION_PROMPT: &str = "Please analyze the attached image and generate a detailed, long and flowing description that is exactly 8 sentences long. \
The description should capture everything you see in a natural, flattering tone, complimenting the interesting qualities of the photo \
and emphasizing its main focus. \
Then produce 10 Instagram caption options \
(each a full descriptive phrase in sentence case, without multiple sentences or dashes), inspired by pop culture and song lyrics when appropriate, \
and occasionally include emojis. \
Format your response exactly as follows:\n\n\
Description: <long, flattering description>\n\
Captions:\n\
1. <caption option 1>\n\
2. <caption option 2>\n\
3. <caption option 3>\n\
4. <caption option 4>\n\
5. <caption option 5>\n\
6. <caption option 6>\n\
7. <caption option 7>\n\
8. <caption option 8>\n\
9. <caption option 9>\n\
10. <caption option 10>";

/// Same as [`CAPTION_PROMPT`] but also asks for a single headline caption.
pub const MAIN_CAPTION_PROMPT: &str = "Please analyze the attached image and generate a detailed, long and flowing description that is exactly 8 sentences long. \
The description should capture everything you see in a natural, flattering tone, complimenting the interesting qualities of the photo \
and emphasizing its main focus. \
Then write one main caption that best sums up the photo, \
followed by 10 Instagram caption options \
(each a full descriptive phrase in sentence case, without multiple sentences or dashes), inspired by pop culture and song lyrics when appropriate, \
and occasionally include emojis. \
Format your response exactly as follows:\n\n\
Description: <long, flattering description>\n\
Main Caption: <main caption>\n\
Captions:\n\
1. <caption option 1>\n\
2. <caption option 2>\n\
3. <caption option 3>\n\
4. <caption option 4>\n\
5. <caption option 5>\n\
6. <caption option 6>\n\
7. <caption option 7>\n\
8. <caption option 8>\n\
9. <caption option 9>\n\
10. <caption option 10>";

/// Pick the prompt matching the parser variant.
pub fn prompt_for(include_main_caption: bool) -> &'static str {
    if include_main_caption {
        MAIN_CAPTION_PROMPT
    } else {
        CAPTION_PROMPT
    }
}
