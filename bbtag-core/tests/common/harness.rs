//! Test harness for running fixture cases with stochastic variations

use crate::common::{Gen, TestCase};
use bbtag_core::{Attributes, Node, Parser, StandardTags};

/// Inline tags that can wrap a fixture input without interacting with it
const WRAPPERS: &[&str] = &["b", "i", "u", "s", "sub", "sup", "color", "size", "font", "email"];

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Compact notation for a node, used by fixtures:
///
/// - text: Rust debug string, `"a\nb"`
/// - element: `name(children...)`, children separated by one space
/// - scalar attribute: `url="x"(...)`
/// - keyed attributes: `video{w="1" h="2"}(...)`
pub fn format_node<F>(node: &Node<'_, F>) -> String {
    match node {
        Node::Text(text) => format!("{:?}", text.as_ref()),
        Node::Element(element) => {
            let attrs = match &element.attrs {
                Attributes::None => String::new(),
                Attributes::Scalar(value) => format!("={:?}", value.as_ref()),
                Attributes::Keyed(pairs) => {
                    let pairs: Vec<String> = pairs
                        .iter()
                        .map(|(k, v)| format!("{}={:?}", k, v.as_ref()))
                        .collect();
                    format!("{{{}}}", pairs.join(" "))
                }
            };
            format!("{}{}({})", element.name, attrs, format_nodes(&element.children).join(" "))
        }
        Node::Foreign(_) => "<foreign>".to_string(),
    }
}

pub fn format_nodes<F>(nodes: &[Node<'_, F>]) -> Vec<String> {
    nodes.iter().map(format_node).collect()
}

fn parse_formatted(input: &str) -> Vec<String> {
    format_nodes(Parser::new(&StandardTags).parse(input).children())
}

fn compare(expected: &[String], actual: &[String]) -> Vec<String> {
    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Node count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Node {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    errors
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual = parse_formatted(&case.input);
    let errors = compare(&case.nodes, &actual);

    TestResult {
        passed: errors.is_empty(),
        input: case.input.clone(),
        expected: case.nodes.clone(),
        actual,
        seed: 0,
        errors,
    }
}

/// An inline tag the input never mentions, if any
fn unused_wrapper(gen: &mut Gen, input: &str) -> Option<&'static str> {
    let lower = input.to_ascii_lowercase();
    let free: Vec<&'static str> = WRAPPERS
        .iter()
        .copied()
        .filter(|name| !lower.contains(&format!("[{}", name)) && !lower.contains(&format!("[/{}", name)))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(*gen.pick(&free))
    }
}

/// Run test with stochastic variations
///
/// Wraps the input in an inline tag it never mentions, with optional prose
/// before and after:
///
/// ```text
/// lorem ipsum [u]<input>[/u] fox
/// ```
///
/// The expected nodes then become `"lorem ipsum "`, `u(<nodes>)`, `" fox"`.
/// Inputs with a `[` that has no later `]` are left alone, since the
/// wrapper's closer would complete that bracket.
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> Option<TestResult> {
    let dangling = match (case.input.rfind('['), case.input.rfind(']')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    };
    if dangling {
        return None;
    }
    let wrapper = unused_wrapper(gen, &case.input)?;

    let mut input = String::new();
    let mut expected = Vec::new();

    // 50% chance: prose before
    if gen.chance(0.5) {
        let before = format!("{} ", gen.words());
        expected.push(format!("{:?}", before));
        input.push_str(&before);
    }

    input.push_str(&format!("[{}]{}[/{}]", wrapper, case.input, wrapper));
    expected.push(format!("{}({})", wrapper, case.nodes.join(" ")));

    // 50% chance: prose after
    if gen.chance(0.5) {
        let after = format!(" {}", gen.words());
        expected.push(format!("{:?}", after));
        input.push_str(&after);
    }

    let actual = parse_formatted(&input);
    let errors = compare(&expected, &actual);

    Some(TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    })
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set BBTAG_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{:?}", self.input);
        eprintln!("\nExpected nodes:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual nodes:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
