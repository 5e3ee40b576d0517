//! Document metadata derived from the schema header
//!
//! The text before the first declaration of a schema file (a `"""` block or
//! a run of `#` comment lines) describes the API as a whole. Its first line
//! becomes the title unless one is configured and the remainder becomes the
//! description.

use crate::{
    config::{ConverterConfig, DEFAULT_TITLE},
    document::{Info, Server},
};

const BLOCK_QUOTE: &str = "\"\"\"";

/// Keywords that start a declaration and end the header
const DECLARATION_KEYWORDS: [&str; 9] = [
    "type ",
    "interface ",
    "scalar ",
    "enum ",
    "union ",
    "input ",
    "directive ",
    "schema ",
    "extend ",
];

/// Extract the leading description of a schema source
pub fn extract_schema_description(source: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in source.lines() {
        let trimmed = line.trim();

        if in_block {
            match trimmed.strip_suffix(BLOCK_QUOTE) {
                Some(last) => {
                    lines.push(last.trim());
                    in_block = false;
                }
                None => lines.push(trimmed),
            }
            continue;
        }

        if let Some(opening) = trimmed.strip_prefix(BLOCK_QUOTE) {
            match opening.strip_suffix(BLOCK_QUOTE) {
                Some(single_line) => lines.push(single_line.trim()),
                None => {
                    lines.push(opening.trim());
                    in_block = true;
                }
            }
            continue;
        }

        if DECLARATION_KEYWORDS
            .iter()
            .any(|keyword| trimmed.starts_with(keyword))
            || trimmed == "schema"
            || trimmed.starts_with("schema{")
        {
            break;
        }

        if let Some(comment) = trimmed.strip_prefix('#') {
            lines.push(comment.trim());
            continue;
        }

        if trimmed.is_empty() && lines.iter().any(|line| !line.is_empty()) {
            break;
        }
    }

    lines.join("\n").trim().to_string()
}

/// Build the document info from the configuration and the schema header
pub fn document_info(config: &ConverterConfig, source: &str) -> Info {
    let header = extract_schema_description(source);
    let (header_title, header_body) = match header.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest.trim()),
        None => (header.trim(), ""),
    };

    let (title, description) = match &config.title {
        Some(title) => (title.clone(), header.as_str()),
        None if !header_title.is_empty() => (header_title.to_string(), header_body),
        None => (DEFAULT_TITLE.to_string(), header.as_str()),
    };

    let footer = format!("Converted from GraphQL ({})", config.version);
    let description = if description.is_empty() {
        footer
    } else {
        format!("{description}\n\n---\n\n{footer}")
    };

    Info {
        title,
        description: Some(description),
        version: config.version.clone(),
    }
}

/// The server list: the configured base URL, if any
pub fn servers(config: &ConverterConfig) -> Vec<Server> {
    config
        .base_url
        .iter()
        .filter(|url| !url.is_empty())
        .map(|url| Server {
            url: url.clone(),
            description: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::block(
        "\"\"\"\nBlog API\nPosts and comments\n\"\"\"\ntype Query { a: Int }",
        "Blog API\nPosts and comments"
    )]
    #[case::single_line_block("\"\"\"Blog API\"\"\"\n\ntype Query { a: Int }", "Blog API")]
    #[case::block_with_inline_text(
        "\"\"\"Blog API\nPosts\"\"\"\ntype Query { a: Int }",
        "Blog API\nPosts"
    )]
    #[case::comments("# Blog API\n#   Posts and comments\ntype Query { a: Int }", "Blog API\nPosts and comments")]
    #[case::stops_at_blank_line("# Blog API\n\n# Not the header\ntype Query { a: Int }", "Blog API")]
    #[case::leading_blank_lines("\n\n# Blog API\ntype Query { a: Int }", "Blog API")]
    #[case::no_header("type Query { a: Int }", "")]
    #[case::type_description_is_not_a_header("type Query {\n\"\"\"Field\"\"\"\na: Int }", "")]
    #[case::schema_definition("schema { query: Q }\n# late\ntype Q { a: Int }", "")]
    fn extracts_the_schema_header(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(extract_schema_description(source), expected);
    }

    #[test]
    fn header_supplies_title_and_description() {
        let info = document_info(
            &ConverterConfig::default(),
            "\"\"\"\nBlog API\nPosts and comments\n\"\"\"\ntype Query { a: Int }",
        );

        assert_eq!(info.title, "Blog API");
        insta::assert_snapshot!(info.description.unwrap(), @r"
        Posts and comments

        ---

        Converted from GraphQL (1.0.0)
        ");
    }

    #[test]
    fn configured_title_keeps_the_whole_header() {
        let config = ConverterConfig {
            title: Some("Explicit".to_string()),
            version: "2.1.0".to_string(),
            ..Default::default()
        };

        let info = document_info(&config, "# Blog API\ntype Query { a: Int }");

        assert_eq!(info.title, "Explicit");
        assert_eq!(info.version, "2.1.0");
        assert_eq!(
            info.description.as_deref(),
            Some("Blog API\n\n---\n\nConverted from GraphQL (2.1.0)")
        );
    }

    #[test]
    fn missing_header_uses_the_default_title() {
        let info = document_info(&ConverterConfig::default(), "type Query { a: Int }");

        assert_eq!(info.title, DEFAULT_TITLE);
        assert_eq!(
            info.description.as_deref(),
            Some("Converted from GraphQL (1.0.0)")
        );
    }

    #[test]
    fn base_url_becomes_the_only_server() {
        let config = ConverterConfig {
            base_url: Some("https://api.example.com".to_string()),
            ..Default::default()
        };

        let servers = servers(&config);

        assert_eq!(servers.len(), 1);
        assert_eq!(
            servers.first().map(|server| server.url.as_str()),
            Some("https://api.example.com")
        );
        assert!(super::servers(&ConverterConfig::default()).is_empty());
    }
}
