use std::{fs, path::Path};

use opreduce::{OutputFormat, render, render_with, symbols::SymbolMap};
use walkdir::WalkDir;

const FORMATS: [OutputFormat; 3] = [OutputFormat::Text, OutputFormat::Markup, OutputFormat::Tree];

#[derive(Debug, Default)]
struct Case {
    input:    String,
    expected: Vec<(OutputFormat, String)>,
    fails:    bool,
}

#[test]
fn golden_cases_render() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/cases").into_iter()
                                   .filter_map(Result::ok)
                                   .filter(|e| e.path().extension().is_some_and(|ext| ext == "case"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for case in parse_cases(path, &content) {
            count += 1;
            check(path, &case);
        }
    }

    assert!(count > 0, "No cases found in tests/cases");
}

fn parse_cases(path: &Path, content: &str) -> Vec<Case> {
    let mut cases = Vec::new();
    let mut current: Option<Case> = None;

    for line in content.lines() {
        let line = line.trim_end();
        if line.starts_with('#') {
            continue;
        }
        if line.is_empty() {
            cases.extend(current.take());
            continue;
        }

        let case = current.get_or_insert_with(Case::default);
        if line == "error" {
            case.fails = true;
            continue;
        }
        let (key, value) = line.split_once(": ")
                               .unwrap_or_else(|| panic!("Bad line in {path:?}: {line}"));
        let format = match key {
            "input" => {
                case.input = value.to_string();
                continue;
            },
            "text" => OutputFormat::Text,
            "markup" => OutputFormat::Markup,
            "tree" => OutputFormat::Tree,
            _ => panic!("Unknown key '{key}' in {path:?}"),
        };
        case.expected.push((format, value.to_string()));
    }

    cases.extend(current);
    cases
}

fn check(path: &Path, case: &Case) {
    if case.fails {
        for format in FORMATS {
            assert!(render(&case.input, format).is_err(),
                    "{path:?}: '{}' rendered as {format:?} but was expected to fail",
                    case.input);
        }
        return;
    }

    assert!(!case.expected.is_empty(), "{path:?}: '{}' has no expectation", case.input);
    for (format, expected) in &case.expected {
        match render(&case.input, *format) {
            Ok(actual) => assert_eq!(&actual, expected, "{path:?}: '{}' as {format:?}", case.input),
            Err(e) => panic!("{path:?}: '{}' failed as {format:?}: {e}", case.input),
        }
    }
}

fn assert_success(src: &str) {
    for format in FORMATS {
        if let Err(e) = render(src, format) {
            panic!("'{src}' failed as {format:?}: {e}");
        }
    }
}

fn assert_failure(src: &str) {
    if render(src, OutputFormat::Text).is_ok() {
        panic!("'{src}' succeeded but was expected to fail")
    }
}

fn text(src: &str) -> String {
    render(src, OutputFormat::Text).unwrap_or_else(|e| panic!("'{src}' failed: {e}"))
}

#[test]
fn text_output_reduces_to_itself() {
    for src in ["2+3*4",
                "(a+b)*(c-d)/e",
                "-(x^2)!",
                "f'(x)+g(y,z)",
                "sum[0<i<=n<>2]i^2",
                "x:=1;y:=x*2;",
                "2(a)(b)",
                "a,b,(c)"]
    {
        let once = text(src);
        assert_eq!(text(&once), once, "'{src}' rendered as '{once}'");
    }
}

#[test]
fn comments_and_whitespace_are_ignored() {
    assert_eq!(text("a  +\tb # trailing note"), "a + b");
}

#[test]
fn every_format_handles_mixed_input() {
    assert_success("x := sum[1 <= k <= n] k^2 / 2; y := sqrt(abs(x)) + 0b101");
    assert_success("f(g(h(1, 2), 3), {4})");
    assert_success("\"label\", 1.5e-3, .25");
}

#[test]
fn malformed_input_is_error() {
    assert_failure("");
    assert_failure("# only a comment");
    assert_failure("((a)");
    assert_failure("sum[0 <= i <= n] [0 <= j <= n] i");
}

#[test]
fn forward_references_persist_across_lines() {
    let mut symbols = SymbolMap::standard();
    render_with("h(1)", &mut symbols, OutputFormat::Text, false).unwrap();
    render_with("k'(2)", &mut symbols, OutputFormat::Tree, false).unwrap();
    let names: Vec<&str> = symbols.forward_references()
                                  .iter()
                                  .map(|operation| operation.name.as_str())
                                  .collect();
    assert_eq!(names, ["h", "k", "k'"]);
}

#[test]
fn pretty_markup_is_indented() {
    let mut symbols = SymbolMap::standard();
    let markup = render_with("x^2", &mut symbols, OutputFormat::Markup, true).unwrap();
    assert_eq!(markup,
               "<math xmlns=\"http://www.w3.org/1998/Math/MathML\">\n  <msup>\n    \
                <mi>x</mi>\n    <mn>2</mn>\n  </msup>\n</math>");
}
