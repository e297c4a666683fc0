//! Integration tests for delimiter recognition and block scanning.

use pretty_assertions::assert_eq;
use qualia_blocks::parser::{BlockState, find_block_start, parse_blocks};
use rstest::rstest;

#[rstest]
#[case("# BEGIN laptop", "#", "laptop")]
#[case("#BEGIN laptop", "#", "laptop")]
#[case("   // BEGIN work", "//", "work")]
#[case("\t;; BEGIN host-a trailing words", ";;", "host-a")]
#[case("-- BEGIN db", "--", "db")]
#[case("\u{a0}# BEGIN laptop", "\u{a0}#", "laptop")]
#[case("rem BEGIN win", "rem", "win")]
fn test_begin_delimiters(#[case] line: &str, #[case] prefix: &str, #[case] quality: &str) {
    let attrs = find_block_start(line.as_bytes()).expect("should match BEGIN");
    assert_eq!(attrs.prefix, prefix.as_bytes());
    assert_eq!(attrs.quality, quality.as_bytes());
}

#[rstest]
#[case("")]
#[case("BEGIN laptop")]
#[case("# BEGIN")]
#[case("# END laptop")]
#[case("export BEGIN_DIR=1")]
#[case("#\u{a0}BEGIN\u{a0}laptop")]
#[case("# BEGIN\x0Blaptop")]
fn test_non_begin_lines(#[case] line: &str) {
    assert!(find_block_start(line.as_bytes()).is_none(), "{:?} should not match", line);
}

#[test]
fn test_end_must_match_prefix_and_quality() {
    let attrs = find_block_start(b"# BEGIN laptop").unwrap();
    assert!(attrs.closes(b"# END laptop"));
    assert!(attrs.closes(b"#END laptop"));
    assert!(attrs.closes(b"    # END laptop # trailing"));
    assert!(!attrs.closes(b"# END desktop"));
    assert!(!attrs.closes(b"## END laptop"));
    assert!(!attrs.closes(b"# END laptop2"));
    assert!(!attrs.closes(b"# END"));
}

#[test]
fn test_no_blocks_returns_empty_vec() {
    let content = "This is some text\nwith no blocks\nat all.";
    assert!(parse_blocks(content.as_bytes()).is_empty());
    assert!(parse_blocks(b"").is_empty());
}

#[test]
fn test_multiple_blocks_parsed() {
    let content = "header
# BEGIN laptop
#export A=1
# END laptop

// BEGIN desktop
let gpu = true;
// END desktop
footer";

    let blocks = parse_blocks(content.as_bytes());
    assert_eq!(blocks.len(), 2);

    assert_eq!(blocks[0].attrs.quality, b"laptop");
    assert_eq!(blocks[0].attrs.prefix, b"#");
    assert_eq!(blocks[0].lines, vec![b"#export A=1".to_vec()]);
    assert_eq!(blocks[0].start_line, 2);
    assert_eq!(blocks[0].end_line, 4);

    assert_eq!(blocks[1].attrs.quality, b"desktop");
    assert_eq!(blocks[1].attrs.prefix, b"//");
    assert_eq!(blocks[1].lines, vec![b"let gpu = true;".to_vec()]);
    assert_eq!(blocks[1].start_line, 6);
    assert_eq!(blocks[1].end_line, 8);
}

#[test]
fn test_blocks_do_not_nest() {
    let content = "# BEGIN outer\n# BEGIN inner\nx\n# END inner\n# END outer\n";
    let blocks = parse_blocks(content.as_bytes());
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].attrs.quality, b"outer");
    assert_eq!(blocks[0].lines, vec![b"# BEGIN inner".to_vec(), b"x".to_vec(), b"# END inner".to_vec()]);
}

#[test]
fn test_block_states() {
    let content = "# BEGIN a\n#x\n#y\n# END a\n# BEGIN b\nx\n# END b\n# BEGIN c\n#x\ny\n# END c\n# BEGIN d\n# END d\n";
    let states: Vec<_> = parse_blocks(content.as_bytes())
        .iter()
        .map(|b| b.state())
        .collect();
    assert_eq!(
        states,
        vec![
            BlockState::Commented,
            BlockState::Uncommented,
            BlockState::Mixed,
            BlockState::Commented,
        ]
    );
    assert_eq!(BlockState::Mixed.to_string(), "mixed");
}

#[test]
fn test_crlf_and_non_utf8_content() {
    let content = b"# BEGIN a\r\n#caf\xe9\r\n# END a\r\n";
    let blocks = parse_blocks(content);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].lines, vec![b"#caf\xe9".to_vec()]);
    assert_eq!(blocks[0].state(), BlockState::Commented);
}
