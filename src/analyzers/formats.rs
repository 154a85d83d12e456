// src/analyzers/formats.rs

//! The built-in file types.

use crate::analyzers::{Container, PresenceAnalyzer, SurveyAnalyzer};
use crate::registry::Registry;
use crate::survey::SurveyOptions;

pub const WHOLE_TREE: &str = "Whole Tree";

const GO_GROUPS: &[&[&str]] = &[&["*.go", "go.mod", "go.sum"]];
const JAVA_GROUPS: &[&[&str]] = &[&["*.java"]];
const TYPESCRIPT_GROUPS: &[&[&str]] = &[&["*.ts", "*.tsx"]];

const GENERIC_GROUPS: &[&[&str]] = &[
    &["*.js", "*.mjs", "*.cjs"],
    &["*.cpp", "*.h", "*.c"],
    &["*.cs"],
    &["*.json"],
    &["*.yaml", "*.yml"],
    &["*.xml"],
    &["*.html", "*.htm"],
    &["*.css"],
    &["*.php"],
    &["*.md"],
    &["*.sh"],
];

const GNU_MAKE_TEMPLATE: &str = "indent_style = tabs\n";
const PYTHON_TEMPLATE: &str = "indent_style = spaces\nindent_size = 4\n";
const RUBY_TEMPLATE: &str = "indent_style = spaces\nindent_size = 2\n";
const RUST_TEMPLATE: &str = "indent_style = spaces\nindent_size = 4\nmax_line_length = 100\n";

fn survey(
    name: &'static str,
    groups: &'static [&'static [&'static str]],
) -> impl Fn(&SurveyOptions) -> Container + Send + Sync {
    move |options: &SurveyOptions| Container::new(name, SurveyAnalyzer::per_type(groups, options.clone()))
}

fn presence(
    name: &'static str,
    globs: &'static [&'static str],
    template: &'static str,
) -> impl Fn(&SurveyOptions) -> Container + Send + Sync {
    move |_: &SurveyOptions| Container::new(name, PresenceAnalyzer::new(globs, template))
}

/// Registers every built-in analyzer.
pub fn register_defaults(registry: &mut Registry) {
    registry.register(|options: &SurveyOptions| {
        Container::new(WHOLE_TREE, SurveyAnalyzer::whole_tree(options.clone()))
    });
    registry.register(survey("Go", GO_GROUPS));
    registry.register(survey("Java", JAVA_GROUPS));
    registry.register(survey("TypeScript", TYPESCRIPT_GROUPS));
    registry.register(survey("Generic", GENERIC_GROUPS));
    registry.register(presence("GNU Make", &["Makefile", "*.mk"], GNU_MAKE_TEMPLATE));
    registry.register(presence("Python", &["*.py"], PYTHON_TEMPLATE));
    registry.register(presence("Ruby", &["*.rb", "Rakefile", "Gemfile"], RUBY_TEMPLATE));
    registry.register(presence("Rust", &["*.rs"], RUST_TEMPLATE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_puts_whole_tree_first() {
        let mut registry = Registry::new();
        register_defaults(&mut registry);
        let names: Vec<String> = registry
            .instantiate(&SurveyOptions::default())
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Whole Tree", "TypeScript", "Rust", "Ruby", "Python", "Java", "Go", "Generic", "GNU Make"]
        );
    }

    #[test]
    fn test_only_survey_analyzers_accept_the_aggregate() {
        let mut registry = Registry::new();
        register_defaults(&mut registry);
        let mut analyzers = registry.instantiate(&SurveyOptions::default());
        let accepting: Vec<String> = analyzers
            .iter_mut()
            .filter_map(|c| {
                let name = c.name().to_string();
                c.runner_mut()
                    .and_then(|r| r.as_aggregate_acceptor())
                    .map(|_| name)
            })
            .collect();
        assert_eq!(accepting, vec!["TypeScript", "Java", "Go", "Generic"]);
    }
}
