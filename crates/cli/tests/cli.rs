use assert_cmd::Command;

fn libris() -> Command {
    Command::cargo_bin("libris").unwrap()
}

fn stdout_of(args: &[&str]) -> String {
    let assert = libris().args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let help = stdout_of(&["--help"]);
    for command in ["serve", "search", "pages", "stars"] {
        assert!(help.contains(command), "help is missing '{}'", command);
    }
}

#[test]
fn pages_prints_window() {
    assert_eq!(
        stdout_of(&["pages", "--total", "500", "--page", "5"]).trim(),
        "< 1 2 3 4 [5] 6 7 … 25 >"
    );
}

#[test]
fn pages_with_one_page_prints_nothing_to_navigate() {
    assert_eq!(
        stdout_of(&["pages", "--total", "10", "--per-page", "20"]).trim(),
        "single page"
    );
}

#[test]
fn pages_with_negative_total_has_no_pages() {
    assert_eq!(stdout_of(&["pages", "--total", "-5"]).trim(), "single page");
}

#[test]
fn stars_prints_glyphs() {
    assert_eq!(stdout_of(&["stars", "3"]).trim(), "★★★☆☆");
}

#[test]
fn stars_rejects_out_of_scale_rating() {
    libris().args(["stars", "7"]).assert().failure();
}
