//! Response parsing tests
use caption_maker::parser::{sentence_case, sentence_case_lower, strip_quotes, MAX_CAPTIONS};
use caption_maker::{parse, CaptionSet, ParserOptions};

fn plain() -> ParserOptions {
    ParserOptions::new()
}

fn with_main() -> ParserOptions {
    ParserOptions::new().with_main_caption(true)
}

const FULL_REPLY: &str = r#"Description: This sun-drenched beach scene glows with warm light. The waves roll in gently.
Captions:
1. "Salt in the air, sand in my hair"
2. here comes the sun 🌞
3. Vitamin sea
4. "Good vibes and high tides"
5. Shore thing
6. Life's a beach, enjoy the waves
7. "Waves for days"
8. Sea you later
9. Beach, please
10. Golden hour, golden heart"#;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_sunset_scenario() {
    let reply = "Description: A lovely sunset.\nCaptions:\n1. \"Golden hour magic\"\n2. chasing sunsets forever";
    let set = parse(reply, plain());

    assert_eq!(set.description, "A lovely sunset.");
    assert_eq!(
        set.captions,
        vec!["Golden hour magic", "Chasing sunsets forever"]
    );
    assert_eq!(set.main_caption, None);
}

#[test]
fn test_full_reply_has_ten_captions_in_order() {
    let set = parse(FULL_REPLY, plain());

    assert_eq!(
        set.description,
        "This sun-drenched beach scene glows with warm light. The waves roll in gently."
    );
    assert_eq!(set.captions.len(), 10);
    assert_eq!(set.captions[0], "Salt in the air, sand in my hair");
    assert_eq!(set.captions[1], "Here comes the sun 🌞");
    assert_eq!(set.captions[9], "Golden hour, golden heart");
}

#[test]
fn test_missing_marker_means_no_captions() {
    let reply = "  A quiet lake at dawn.  \nMist hangs over the water.\n1. Not a caption";
    let set = parse(reply, plain());

    assert!(set.captions.is_empty());
    assert_eq!(
        set.description,
        "A quiet lake at dawn. Mist hangs over the water. 1. Not a caption"
    );
}

#[test]
fn test_empty_numbered_line_is_dropped() {
    let reply = "Description: x\nCaptions:\n1. First\n2.\n3. \n4. Fourth";
    let set = parse(reply, plain());

    assert_eq!(set.captions, vec!["First", "Fourth"]);
}

#[test]
fn test_quote_only_caption_keeps_its_slot() {
    let set = parse("Captions:\n1. \"\"\n2. b", plain());
    assert_eq!(set.captions, vec!["", "B"]);

    let set = parse("Captions:\n1. ''\n2. b", with_main());
    assert_eq!(set.captions, vec!["", "B"]);
}

#[test]
fn test_uppercase_marker_is_recognized() {
    let reply = "Description: Dogs at play.\nCAPTIONS:\n1. ruff day";
    let set = parse(reply, plain());

    assert_eq!(set.description, "Dogs at play.");
    assert_eq!(set.captions, vec!["Ruff day"]);
}

#[test]
fn test_marker_mid_line_splits_there() {
    let reply = "Description: Great photo. Captions: 1. inline\n1. real one";
    let set = parse(reply, plain());

    assert_eq!(set.description, "Great photo.");
    assert_eq!(set.captions, vec!["Inline", "Real one"]);
}

#[test]
fn test_empty_reply() {
    assert_eq!(parse("", plain()), CaptionSet::default());
    assert_eq!(parse("", with_main()), CaptionSet::default());
}

// ============================================================================
// Description handling
// ============================================================================

#[test]
fn test_description_prefix_is_case_insensitive() {
    let set = parse("DESCRIPTION:   Shouting sunset   \nCaptions:", plain());
    assert_eq!(set.description, "Shouting sunset");
}

#[test]
fn test_description_fallback_joins_head_lines() {
    let reply = "Here is what I see:\n  A cat on a windowsill.\nCaptions:\n1. Purrfect";
    let set = parse(reply, plain());

    assert_eq!(set.description, "Here is what I see: A cat on a windowsill.");
    assert_eq!(set.captions, vec!["Purrfect"]);
}

#[test]
fn test_fallback_keeps_main_caption_line_without_flag() {
    let reply = "A cat.\nMain Caption: Cat nap\nCaptions:\n1. Purr";
    let set = parse(reply, plain());

    assert_eq!(set.description, "A cat. Main Caption: Cat nap");
    assert_eq!(set.main_caption, None);
}

#[test]
fn test_fallback_skips_main_caption_line_with_flag() {
    let reply = "A cat.\nMain Caption: Cat nap\nCaptions:\n1. Purr";
    let set = parse(reply, with_main());

    assert_eq!(set.description, "A cat.");
    assert_eq!(set.main_caption.as_deref(), Some("Cat nap"));
}

#[test]
fn test_description_with_extra_colons() {
    let set = parse("Description: Time: 5pm, place: the pier", plain());
    assert_eq!(set.description, "Time: 5pm, place: the pier");
}

// ============================================================================
// Main caption variant
// ============================================================================

#[test]
fn test_main_caption_variant() {
    let reply = "Description: City lights.\nMain Caption:  Neon dreams \nCaptions:\n1. 'CITY LIGHTS, BIG DREAMS'\n2. \"NIGHT OWL\"";
    let set = parse(reply, with_main());

    assert_eq!(set.description, "City lights.");
    assert_eq!(set.main_caption.as_deref(), Some("Neon dreams"));
    assert_eq!(set.captions, vec!["City lights, big dreams", "Night owl"]);
}

#[test]
fn test_plain_variant_keeps_single_quotes_and_case() {
    let reply = "Captions:\n1. 'CITY LIGHTS'\n2. iPhone shot";
    let set = parse(reply, plain());

    assert_eq!(set.captions, vec!["'CITY LIGHTS'", "IPhone shot"]);
}

#[test]
fn test_empty_main_caption_is_none() {
    let set = parse("Description: x\nMain Caption:   \nCaptions:", with_main());
    assert_eq!(set.main_caption, None);
}

// ============================================================================
// Caption list properties
// ============================================================================

#[test]
fn test_out_of_order_and_duplicate_indices_kept_as_encountered() {
    let reply = "Captions:\n3. third\n1. first\n1. first again\n2. second";
    let set = parse(reply, plain());

    assert_eq!(
        set.captions,
        vec!["Third", "First", "First again", "Second"]
    );
}

#[test]
fn test_caption_count_is_capped() {
    let mut reply = String::from("Captions:\n");
    for i in 0..15 {
        reply.push_str(&format!("{}. caption {}\n", i % 10 + 1, i));
    }
    let set = parse(&reply, plain());

    assert_eq!(set.captions.len(), MAX_CAPTIONS);
    assert_eq!(set.captions[0], "Caption 0");
    assert_eq!(set.captions[9], "Caption 9");
}

#[test]
fn test_unnumbered_and_indented_lines() {
    let reply = "Captions:\n   1.   indented  \n- bullet\n11. eleven\n0. zero\nsome chatter\n2) paren";
    let set = parse(reply, plain());

    assert_eq!(set.captions, vec!["Indented"]);
}

#[test]
fn test_parse_is_deterministic() {
    assert_eq!(parse(FULL_REPLY, plain()), parse(FULL_REPLY, plain()));
    assert_eq!(parse(FULL_REPLY, with_main()), parse(FULL_REPLY, with_main()));
}

#[test]
fn test_columns_split_floor_half_first() {
    let set = parse(FULL_REPLY, plain());
    let (left, right) = set.columns();
    assert_eq!(left.len(), 5);
    assert_eq!(right.len(), 5);

    let odd = CaptionSet {
        captions: vec!["a".into(), "b".into(), "c".into()],
        ..Default::default()
    };
    let (left, right) = odd.columns();
    assert_eq!(left, ["a"]);
    assert_eq!(right, ["b", "c"]);

    let captions = CaptionSet::default();
    let (left, right) = captions.columns();
    assert!(left.is_empty() && right.is_empty());
}

#[test]
fn test_copy_text_strips_quotes() {
    let set = CaptionSet {
        captions: vec!["'Sea you later'".into(), "Plain".into()],
        ..Default::default()
    };
    assert_eq!(set.copy_text(0).as_deref(), Some("Sea you later"));
    assert_eq!(set.copy_text(1).as_deref(), Some("Plain"));
    assert_eq!(set.copy_text(2), None);
}

// ============================================================================
// Helpers
// ============================================================================

#[test]
fn test_strip_quotes_is_idempotent_on_single_layer() {
    let samples = [
        "\"hello\"",
        "'single'",
        "  \" padded \"  ",
        "no quotes",
        "\"unbalanced",
        "\"",
        "",
    ];
    for quotes in [&['"'][..], &['"', '\''][..]] {
        for sample in samples {
            let once = strip_quotes(sample, quotes);
            assert_eq!(strip_quotes(&once, quotes), once, "sample {:?}", sample);
        }
    }
    assert_eq!(strip_quotes("  \" padded \"  ", &['"']), "padded");
    assert_eq!(strip_quotes("'single'", &['"']), "'single'");
    assert_eq!(strip_quotes("'single'", &['"', '\'']), "single");
}

#[test]
fn test_strip_quotes_removes_one_layer() {
    assert_eq!(
        strip_quotes("\"'tis the season'\"", &['"', '\'']),
        "'tis the season'"
    );
    assert_eq!(strip_quotes("\"\"nested\"\"", &['"']), "\"nested\"");
    assert_eq!(strip_quotes("'\"mixed\"'", &['"', '\'']), "\"mixed\"");

    let set = parse("Captions:\n1. \"'tis the season'\"", with_main());
    assert_eq!(set.captions, vec!["'tis the season'"]);
}

#[test]
fn test_sentence_case_idempotent_on_sentence_cased_ascii() {
    for sample in ["Hello world", "Already Fine", "A", "", "123 go"] {
        let once = sentence_case(sample);
        assert_eq!(sentence_case(&once), once);
    }
    assert_eq!(sentence_case("hello World"), "Hello World");
    assert_eq!(sentence_case("élan"), "Élan");
}

#[test]
fn test_sentence_case_lower() {
    assert_eq!(sentence_case_lower("hELLO World"), "Hello world");
    assert_eq!(sentence_case_lower(""), "");
    let once = sentence_case_lower("Good vibes only");
    assert_eq!(sentence_case_lower(&once), once);
}
