//! Behaviour of the parent POM recipe on whole documents

use std::fs;

use xedit::{parse, DisableParentRelativePath, ErrorKind, Recipe};

fn recipe() -> DisableParentRelativePath {
    DisableParentRelativePath::new()
}

fn fixture(name: &str) -> Result<String, std::io::Error> {
    fs::read_to_string(format!(
        "{}/tests/fixtures/valid/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

#[test]
fn test_prefix_inheritance_example() -> Result<(), Box<dyn std::error::Error>> {
    let input = "<project><parent>\n    <artifactId>foo</artifactId></parent></project>";
    let output = recipe().apply(input)?;
    assert_eq!(
        output,
        "<project><parent>\n    <artifactId>foo</artifactId>\n    <relativePath/></parent></project>"
    );
    Ok(())
}

#[test]
fn test_plugin_pom_gets_relative_path() -> Result<(), Box<dyn std::error::Error>> {
    let input = fixture("plugin-pom.xml")?;
    let output = recipe().apply(&input)?;
    let expected = input.replace(
        "    <version>4.88</version>\n  </parent>",
        "    <version>4.88</version>\n    <relativePath/>\n  </parent>",
    );
    assert_ne!(expected, input);
    assert_eq!(output, expected);
    Ok(())
}

#[test]
fn test_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let input = fixture("plugin-pom.xml")?;
    let once = recipe().apply(&input)?;
    let twice = recipe().apply(&once)?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_no_anchor_is_noop() -> Result<(), Box<dyn std::error::Error>> {
    let input = "<project>\n  <parent>\n    <groupId>g</groupId>\n  </parent>\n</project>\n";
    assert_eq!(recipe().apply(input)?, input);
    Ok(())
}

#[test]
fn test_already_present_is_noop_in_any_position() -> Result<(), Box<dyn std::error::Error>> {
    let inputs = [
        "<project><parent><relativePath/><artifactId>a</artifactId></parent></project>",
        "<project><parent><artifactId>a</artifactId><relativePath>../pom.xml</relativePath></parent></project>",
        "<project><parent><groupId>g</groupId><relativePath/><artifactId>a</artifactId></parent></project>",
    ];
    for input in inputs {
        assert_eq!(recipe().apply(input)?, input);
    }
    Ok(())
}

#[test]
fn test_crlf_document_already_applied() -> Result<(), Box<dyn std::error::Error>> {
    let input = fixture("crlf-tabs.xml")?;
    assert_eq!(recipe().apply(&input)?, input);
    Ok(())
}

#[test]
fn test_dependency_with_same_shape_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let input = "<project>\n  <dependencies>\n    <dependency>\n      <artifactId>x</artifactId>\n    \
        </dependency>\n  </dependencies>\n  <parent>\n    <artifactId>p</artifactId>\n  </parent>\n</project>";
    let output = recipe().apply(input)?;
    assert_eq!(
        output,
        input.replace(
            "<artifactId>p</artifactId>\n  </parent>",
            "<artifactId>p</artifactId>\n    <relativePath/>\n  </parent>"
        )
    );

    let doc = parse(&output)?;
    let dependency = doc
        .root()
        .and_then(|r| r.child("dependencies"))
        .and_then(|d| d.child("dependency"))
        .ok_or("missing dependency")?;
    assert!(!dependency.has_child("relativePath"));
    Ok(())
}

#[test]
fn test_parent_under_other_root_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let input = "<settings><parent><artifactId>a</artifactId></parent></settings>";
    assert_eq!(recipe().apply(input)?, input);
    Ok(())
}

#[test]
fn test_malformed_input_is_error() {
    let err = recipe().apply("<parent><artifactId>foo</parent>").err();
    assert!(matches!(
        err.as_ref().map(|e| e.kind()),
        Some(ErrorKind::UnmatchedClosingTag { .. })
    ));
}

#[test]
fn test_edit_leaves_original_tree_reusable() -> Result<(), Box<dyn std::error::Error>> {
    let input = "<project><parent><artifactId>a</artifactId></parent></project>";
    let doc = parse(input)?;
    let edited = recipe().edit(&doc);
    assert_ne!(edited, doc);
    assert_eq!(xedit::print(&doc), input);
    assert_eq!(recipe().edit(&edited), edited);
    Ok(())
}

#[test]
fn test_independent_documents_in_parallel() -> Result<(), Box<dyn std::error::Error>> {
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("<project>\n  <parent>\n    <artifactId>p{i}</artifactId>\n  </parent>\n</project>"))
        .collect();
    let recipe = &recipe();

    let outputs = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || recipe.apply(input)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| "worker panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for (input, output) in inputs.iter().zip(outputs) {
        assert_eq!(output?, recipe.apply(input)?);
    }
    Ok(())
}

#[test]
fn test_byte_order_mark_survives_edit() -> Result<(), Box<dyn std::error::Error>> {
    let input = fixture("bom-pom.xml")?;
    assert!(input.starts_with('\u{FEFF}'));
    let output = recipe().apply(&input)?;
    let expected = input.replace(
        "\t\t<version>4.88</version>\r\n\t</parent>",
        "\t\t<version>4.88</version>\r\n\t\t<relativePath/>\r\n\t</parent>",
    );
    assert_ne!(expected, input);
    assert_eq!(output, expected);
    assert_eq!(recipe().apply(&output)?, output);
    Ok(())
}

#[test]
fn test_default_depth_limit_on_worker_thread() -> Result<(), Box<dyn std::error::Error>> {
    let max = usize::from(xedit::Config::default().max_depth);
    // the project root takes one level of the budget
    let deep = |levels: usize| {
        format!(
            "<project>\n  <parent>\n    <artifactId>p</artifactId>\n  </parent>\n  {}{}\n</project>",
            "<a>".repeat(levels),
            "</a>".repeat(levels)
        )
    };

    let worker = std::thread::spawn(move || {
        let recipe = recipe();
        let fits = recipe.apply(&deep(max - 1));
        let too_deep = recipe.apply(&deep(max)).err().map(|e| e.kind().clone());
        (fits.map(|out| out.contains("<relativePath/>")), too_deep)
    });
    let (fits, too_deep) = worker.join().map_err(|_| "worker panicked")?;
    assert_eq!(fits, Ok(true));
    assert_eq!(too_deep, Some(ErrorKind::TooDeep { max: 256 }));
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_descriptor_serializes() -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_value(recipe().descriptor())?;
    assert_eq!(json["name"], "Disables local file resolution for parent POM");
    assert!(json["description"]
        .as_str()
        .is_some_and(|d| d.contains("<relativePath/>")));
    Ok(())
}
