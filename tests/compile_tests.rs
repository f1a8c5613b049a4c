mod common;

use common::Fixture;
use std::fs;
use wuic::{compile, Error};

const TWO_FIELDS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<page xmlns="urn:wuic:core">
    <field name="title" type="java.lang.String" value="Orders"/>
    <field name="limit" type="int" value="25"/>
</page>
"#;

#[test]
fn two_fields_compile_to_expected_servlet() {
    let fixture = Fixture::new();
    fixture.template("shop/orders.wui", TWO_FIELDS);

    let path = compile("shop/orders.wui", &fixture.config()).expect("compile");
    assert_eq!(path, fixture.destination.path().join("wui/shop/orders.java"));

    let expected = "\
// Generated by wuic from shop/orders.wui. Do not edit.
package wui.shop;

import javax.servlet.http.HttpServlet;
import javax.servlet.http.HttpServletRequest;
import javax.servlet.http.HttpServletResponse;
import javax.servlet.ServletException;
import java.io.IOException;

public final class orders extends HttpServlet {

    @Override
    public void init() throws ServletException {
        super.init();
    }

    @Override
    public void destroy() {
        super.destroy();
    }

    @Override
    public void service(final HttpServletRequest request, final HttpServletResponse response) throws ServletException, IOException {
        final String title = \"Orders\";
        final int limit = 25;
        response.flushBuffer();
    }
}
";
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn recompiling_yields_identical_output() {
    let fixture = Fixture::new();
    fixture.template("index.wui", TWO_FIELDS);
    let config = fixture.config();

    let first = fs::read_to_string(compile("index.wui", &config).unwrap()).unwrap();
    let second = fs::read_to_string(compile("index.wui", &config).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(fixture.artifacts().len(), 1);
}

#[test]
fn unresolved_tag_leaves_no_artifact() {
    let fixture = Fixture::new();
    fixture.template(
        "broken.wui",
        "<page>\n  <field name=\"a\" type=\"int\" value=\"1\"/>\n  <marquee/>\n</page>\n",
    );

    match compile("broken.wui", &fixture.config()) {
        Err(Error::UnresolvedTag { namespace, name, line }) => {
            assert_eq!(namespace, "");
            assert_eq!(name, "marquee");
            assert_eq!(line, 3);
        }
        other => panic!("expected UnresolvedTag, got {:?}", other),
    }
    assert!(fixture.artifacts().is_empty());
}

#[test]
fn failed_recompile_keeps_previous_artifact() {
    let fixture = Fixture::new();
    fixture.template("index.wui", TWO_FIELDS);
    let config = fixture.config();
    let path = compile("index.wui", &config).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    fixture.template("index.wui", "<page><field name=\"x\"/></page>");
    assert!(matches!(
        compile("index.wui", &config),
        Err(Error::MalformedTemplate { .. })
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(fixture.artifacts(), vec![path]);
}

#[test]
fn charset_and_content_type_directives() {
    let fixture = Fixture::new();
    fixture.template(
        "index.wui",
        "<page xmlns=\"urn:wuic:core\" contentType=\"text/html\"><text>Hi &amp; bye</text></page>",
    );
    let config = fixture.config().with_charset("UTF-8").with_package_prefix("");
    let source = fs::read_to_string(compile("index.wui", &config).unwrap()).unwrap();

    assert!(source.starts_with("// Generated by wuic from index.wui. Do not edit.\n\nimport "));
    let body: Vec<&str> = source
        .lines()
        .skip_while(|l| !l.contains("void service("))
        .skip(1)
        .take(4)
        .map(str::trim)
        .collect();
    assert_eq!(
        body,
        vec![
            "request.setCharacterEncoding(\"UTF-8\");",
            "response.setContentType(\"text/html\");",
            "response.getWriter().write(\"Hi & bye\");",
            "response.flushBuffer();",
        ]
    );
}

#[test]
fn fragments_become_private_methods() {
    let fixture = Fixture::new();
    fixture.template(
        "layout.wui",
        r#"<page>
    <fragment name="header">
        <var name="label" type="String" value="Top"/>
        <text>@{label}</text>
    </fragment>
    <fragment name="header">
        <comment>second header</comment>
    </fragment>
</page>"#,
    );
    let source = fs::read_to_string(compile("layout.wui", &fixture.config()).unwrap()).unwrap();

    let service = source.find("public void service(").unwrap();
    let header = source.find("private void header(").unwrap();
    let header2 = source.find("private void header2(").unwrap();
    assert!(service < header && header < header2);
    assert!(source.contains("        header(request, response);\n        header2(request, response);\n"));
    assert!(source.contains("        String label = \"Top\";\n        response.getWriter().write(String.valueOf(label));\n"));
    assert!(source.contains("        // second header\n"));
}

#[test]
fn conditional_blocks_release_their_variables() {
    let fixture = Fixture::new();
    fixture.template(
        "cond.wui",
        r#"<page>
    <bean type="java.util.ArrayList&lt;String&gt;" name="items"/>
    <if test="@{items.isEmpty()}">
        <var name="message" type="String" value="empty"/>
        <text>@{message}</text>
        <else>
            <var name="message" type="String" value="@{items.size() + &quot; items&quot;}"/>
            <text>@{message}</text>
        </else>
    </if>
</page>"#,
    );
    let source = fs::read_to_string(compile("cond.wui", &fixture.config()).unwrap()).unwrap();

    assert!(source.contains("import java.util.ArrayList;\n"));
    assert!(source.contains("final ArrayList<String> items = new ArrayList<String>();"));
    assert!(source.contains("if (items.isEmpty()) {"));
    assert!(source.contains("String message = \"empty\";"));
    // the then-branch slot is out of reach in the else-branch
    assert!(source.contains("String message2 = items.size() + \" items\";"));
}

#[test]
fn invalid_type_spec_is_reported() {
    let fixture = Fixture::new();
    fixture.template("bad.wui", "<page><field name=\"x\" type=\"java.util.List&lt;\" value=\"@{null}\"/></page>");
    assert!(matches!(
        compile("bad.wui", &fixture.config()),
        Err(Error::InvalidTypeSpec { .. })
    ));
    assert!(fixture.artifacts().is_empty());
}

#[test]
fn text_writes_numbers_as_strings() {
    let fixture = Fixture::new();
    fixture.template(
        "count.wui",
        r#"<page><var name="count" type="int" value="65"/><text>@{count}</text></page>"#,
    );
    let source = fs::read_to_string(compile("count.wui", &fixture.config()).unwrap()).unwrap();
    assert!(source.contains("int count = 65;"));
    assert!(source.contains("response.getWriter().write(String.valueOf(count));"));
}

#[test]
fn unregistered_namespace_is_unresolved() {
    let fixture = Fixture::new();
    fixture.template(
        "foreign.wui",
        "<x:page xmlns:x=\"urn:unknown\">\n  <x:field name=\"a\" type=\"int\" value=\"1\"/>\n</x:page>",
    );
    match compile("foreign.wui", &fixture.config()) {
        Err(Error::UnresolvedTag { namespace, name, line }) => {
            assert_eq!((namespace.as_str(), name.as_str(), line), ("urn:unknown", "page", 1));
        }
        other => panic!("expected UnresolvedTag, got {:?}", other),
    }
    assert!(fixture.artifacts().is_empty());
}

#[test]
fn integer_values_must_fit_their_type() {
    let fixture = Fixture::new();
    fixture.template(
        "limits.wui",
        r#"<page>
    <field name="small" type="byte" value="-128"/>
    <field name="max" type="int" value="2147483647"/>
    <field name="big" type="long" value="3000000000"/>
</page>"#,
    );
    let source = fs::read_to_string(compile("limits.wui", &fixture.config()).unwrap()).unwrap();
    assert!(source.contains("final byte small = -128;"));
    assert!(source.contains("final int max = 2147483647;"));
    assert!(source.contains("final long big = 3000000000L;"));

    fixture.template("overflow.wui", r#"<page><field name="a" type="int" value="3000000000"/></page>"#);
    assert!(matches!(
        compile("overflow.wui", &fixture.config()),
        Err(Error::InvalidBinding { .. })
    ));
    fixture.template("short.wui", r#"<page><field name="s" type="short" value="32768"/></page>"#);
    assert!(matches!(
        compile("short.wui", &fixture.config()),
        Err(Error::InvalidBinding { .. })
    ));
}

#[test]
fn digit_names_become_valid_identifiers() {
    let fixture = Fixture::new();
    fixture.template(
        "digits.wui",
        r#"<page><fragment name="12"><field name="3d" type="int" value="1"/></fragment></page>"#,
    );
    let source = fs::read_to_string(compile("digits.wui", &fixture.config()).unwrap()).unwrap();
    assert!(source.contains("        cmp(request, response);\n"));
    assert!(source.contains("private void cmp(final HttpServletRequest request"));
    assert!(source.contains("final int d = 1;"));
    assert!(!source.contains("void 2("));
}

#[test]
fn comment_text_cannot_escape_into_code() {
    let fixture = Fixture::new();
    fixture.template("cr.wui", "<page><comment>a&#13;System.exit(1);</comment></page>");
    let source = fs::read_to_string(compile("cr.wui", &fixture.config()).unwrap()).unwrap();
    assert!(source.contains("        // a\n        // System.exit(1);\n"));
    assert!(!source.contains('\r'));
}

#[test]
fn quoted_at_sign_inside_binding() {
    let fixture = Fixture::new();
    fixture.template(
        "mail.wui",
        r#"<page><field name="address" type="String" value="@{String.format(&quot;%s@%s}&quot;, user, host)}"/></page>"#,
    );
    let source = fs::read_to_string(compile("mail.wui", &fixture.config()).unwrap()).unwrap();
    assert!(source.contains("final String address = String.format(\"%s@%s}\", user, host);"));
}
