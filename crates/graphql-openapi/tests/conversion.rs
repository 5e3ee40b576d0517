use graphql_openapi::{
    Converter, ConverterConfig, OutputFormat, ResourcePattern,
    document::{OpenApiDocument, Operation},
    render,
    rest_patterns::CrudOperation,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const BLOG: &str = r#"
"""
Blog API
Posts, comments and the people who write them
"""

scalar UUID @specifiedBy(url: "https://tools.ietf.org/html/rfc4122")

type Query {
  users: [User!]!
  user(id: ID!): User
  "Search posts by title. Case insensitive"
  searchPosts(term: String!, tags: [String!]): [Post!]!
}

type Mutation {
  createUser(name: String!, email: String): User!
  updateUser(id: ID!, name: String): User
  deleteUser(id: ID!): Boolean
  "Add a comment to a post"
  addComment(postId: ID!, text: String!): Comment
}

type Subscription {
  messageStream(channelId: ID!, userId: ID): Message!
}

type User {
  id: UUID!
  name: String!
  nickname: String @deprecated(reason: "Use name")
  posts: [Post!]!
  manager: User
}

type Post {
  id: ID!
  title: String!
  tags: [String!]!
  author: User!
  comments: [Comment!]!
}

type Comment {
  id: ID!
  text: String!
}

type Message {
  id: ID!
  body: String!
}
"#;

#[fixture]
fn converter() -> Converter {
    Converter::new(ConverterConfig::default())
}

fn convert(converter: &Converter, source: &str) -> OpenApiDocument {
    converter.convert(source, "blog.graphql").unwrap().document
}

fn operation<'d>(document: &'d OpenApiDocument, path: &str, method: &str) -> Option<&'d Operation> {
    document
        .paths
        .get(path)
        .and_then(|item| item.operations().find(|(m, _)| *m == method))
        .map(|(_, operation)| operation)
}

fn component(document: &OpenApiDocument, name: &str) -> Value {
    let schema = document
        .components
        .as_ref()
        .and_then(|components| components.schemas.get(name))
        .unwrap();
    serde_json::to_value(schema).unwrap()
}

#[rstest]
fn consolidates_the_user_resource(converter: Converter) {
    let conversion = converter.convert(BLOG, "blog.graphql").unwrap();

    assert_eq!(
        conversion.patterns,
        vec![ResourcePattern {
            resource: "user".to_string(),
            plural: "users".to_string(),
            target_type: "User".to_string(),
            operations: CrudOperation::List
                | CrudOperation::Get
                | CrudOperation::Create
                | CrudOperation::Update
                | CrudOperation::Delete,
        }]
    );

    let document = conversion.document;
    assert!(operation(&document, "/users", "get").is_some());
    assert!(operation(&document, "/users/{id}", "get").is_some());
    assert!(operation(&document, "/users", "post").is_some());
    assert!(!document.paths.contains_key("/user"));
    assert!(!document.paths.contains_key("/createUser"));
    assert!(!document.paths.contains_key("/updateUser"));
    assert!(!document.paths.contains_key("/deleteUser"));
}

#[rstest]
fn minimal_crud_scenario(converter: Converter) {
    let document = convert(
        &converter,
        r#"
        type Query {
          users: [User!]!
          user(id: ID!): User
        }
        type Mutation { createUser(name: String!): User! }
        type User { id: ID! name: String! }
        "#,
    );

    let paths: Vec<_> = document.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/users", "/users/{id}"]);

    let list = operation(&document, "/users", "get").unwrap();
    assert_eq!(
        serde_json::to_value(&list.responses).unwrap(),
        json!({
            "200": {
                "description": "Successful response",
                "content": {
                    "application/json": {
                        "schema": { "type": "array", "items": { "$ref": "#/components/schemas/User" } }
                    }
                }
            }
        })
    );

    let get = operation(&document, "/users/{id}", "get").unwrap();
    let get = serde_json::to_value(get).unwrap();
    assert_eq!(
        get["responses"]["200"]["content"]["application/json"]["schema"],
        json!({ "$ref": "#/components/schemas/User" })
    );

    let create = operation(&document, "/users", "post").unwrap();
    let body = serde_json::to_value(create.request_body.as_ref().unwrap()).unwrap();
    assert_eq!(
        body["content"]["application/json"]["schema"],
        json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        })
    );
}

#[rstest]
fn specified_by_sets_the_uuid_format(converter: Converter) {
    let document = convert(&converter, BLOG);

    let user = component(&document, "User");
    assert_eq!(user["properties"]["id"]["format"], json!("uuid"));
    assert!(
        user["properties"]["id"]["description"]
            .as_str()
            .unwrap()
            .ends_with("Spec: https://tools.ietf.org/html/rfc4122")
    );
    assert!(
        document
            .components
            .as_ref()
            .is_some_and(|components| !components.schemas.contains_key("UUID"))
    );
}

#[rstest]
fn subscriptions_become_sse_endpoints(converter: Converter) {
    let document = convert(&converter, BLOG);

    let stream = operation(&document, "/messageStream/{channelId}", "get").unwrap();
    let stream = serde_json::to_value(stream).unwrap();

    assert_eq!(
        stream["parameters"],
        json!([
            { "name": "channelId", "in": "path", "required": true, "schema": { "type": "string" } },
            { "name": "userId", "in": "query", "schema": { "type": "string" } }
        ])
    );
    assert!(
        stream["responses"]["200"]["content"]
            .as_object()
            .unwrap()
            .contains_key("text/event-stream")
    );
    assert!(!document.paths.contains_key("/messageStream"));
}

#[rstest]
fn unmatched_mutations_stay_unconsolidated(converter: Converter) {
    let document = convert(&converter, BLOG);

    let add = operation(&document, "/addComment", "post").unwrap();
    assert_eq!(add.operation_id.as_deref(), Some("addComment"));
    assert!(!document.paths.contains_key("/comments"));
}

#[rstest]
fn object_schemas_flatten_references(converter: Converter) {
    let document = convert(&converter, BLOG);

    let post = component(&document, "Post");
    assert_eq!(
        post,
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "title": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "authorId": {
                    "type": "string",
                    "description": "Reference to User.id - use GET /users/{authorId}"
                }
            },
            "required": ["id", "title", "tags", "authorId"]
        })
    );
}

/// Every non-null scalar field is required, and every dropped list field has a sub-resource
#[rstest]
fn required_fields_and_sub_resources_line_up(converter: Converter) {
    let document = convert(&converter, BLOG);

    let cases = [
        ("User", "users", vec!["id", "name"], vec!["posts"]),
        ("Post", "posts", vec!["id", "title", "tags", "authorId"], vec!["comments"]),
        ("Comment", "comments", vec!["id", "text"], vec![]),
    ];
    for (type_name, collection, required, sub_resources) in cases {
        let schema = component(&document, type_name);
        assert_eq!(schema["required"], json!(required), "{type_name}");

        for field in sub_resources {
            assert!(schema["properties"].get(field).is_none(), "{type_name}.{field}");
            assert!(
                operation(&document, &format!("/{collection}/{{id}}/{field}"), "get").is_some(),
                "{type_name}.{field}"
            );
        }
    }

    let user = component(&document, "User");
    assert_eq!(user["properties"]["nickname"]["deprecated"], json!(true));
    assert_eq!(
        user["properties"]["managerId"]["description"],
        json!("Reference to User.id - use GET /users/{managerId}")
    );
}

#[rstest]
fn header_supplies_document_info(converter: Converter) {
    let document = convert(&converter, BLOG);

    assert_eq!(document.openapi, "3.0.0");
    assert_eq!(document.info.title, "Blog API");
    assert_eq!(
        document.info.description.as_deref(),
        Some("Posts, comments and the people who write them\n\n---\n\nConverted from GraphQL (1.0.0)")
    );
    assert!(document.servers.is_empty());
}

#[rstest]
#[case(OutputFormat::Yaml)]
#[case(OutputFormat::Json)]
fn conversion_is_idempotent(converter: Converter, #[case] format: OutputFormat) {
    let first = render(&convert(&converter, BLOG), format).unwrap();
    let second = render(&convert(&converter, BLOG), format).unwrap();

    assert_eq!(first, second);
}

#[test]
fn disabled_detection_emits_every_field_one_to_one() {
    let converter = Converter::new(ConverterConfig {
        detect_rest_patterns: false,
        base_url: Some("https://api.example.com".to_string()),
        path_prefix: "/api".to_string(),
        ..Default::default()
    });

    let conversion = converter.convert(BLOG, "blog.graphql").unwrap();

    assert!(conversion.patterns.is_empty());
    let document = conversion.document;
    for path in ["/api/users", "/api/user", "/api/createUser", "/api/deleteUser"] {
        assert!(document.paths.contains_key(path), "{path}");
    }
    assert_eq!(
        document.servers.first().map(|server| server.url.as_str()),
        Some("https://api.example.com")
    );
}

#[test]
fn parse_errors_are_fatal() {
    let error = Converter::default()
        .convert("type Query { users: [User!]! ", "broken.graphql")
        .unwrap_err();

    assert!(
        error
            .to_string()
            .starts_with("Could not parse GraphQL schema:")
    );
}

#[test]
fn renders_a_complete_yaml_document() {
    let document = Converter::default()
        .convert(
            r#"
            type Query { tags: [String!]! }
            enum Role { ADMIN USER }
            "#,
            "tags.graphql",
        )
        .unwrap()
        .document;

    insta::assert_snapshot!(render(&document, OutputFormat::Yaml).unwrap(), @r#"
    openapi: 3.0.0
    info:
      title: Converted from GraphQL
      description: Converted from GraphQL (1.0.0)
      version: 1.0.0
    paths:
      /tags:
        get:
          operationId: tags
          summary: Tags
          description: Tags
          responses:
            '200':
              description: Successful response
              content:
                application/json:
                  schema:
                    type: array
                    items:
                      type: string
    components:
      schemas:
        Role:
          type: string
          enum:
          - ADMIN
          - USER
    "#);
}
