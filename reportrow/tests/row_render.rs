//! Integration tests for building and rendering rows

use reportrow::{
    FormatterRegistry, OutputFormat, QtyValue, RenderSpecs, Rendered, ReportError, ReportableQty,
    Row,
};

fn normal(
    qty: &ReportableQty,
    _label: &ReportableQty,
    specs: &RenderSpecs,
) -> reportrow::Result<Rendered> {
    Ok(Rendered::single(format!(
        "<{}>",
        qty.value().to_string_with_precision(specs.precision)
    )))
}

fn error_bars(
    qty: &ReportableQty,
    _label: &ReportableQty,
    specs: &RenderSpecs,
) -> reportrow::Result<Rendered> {
    let value = qty.value().to_string_with_precision(specs.precision);
    match qty.errbar() {
        Some(err) => Ok(Rendered::multiple([
            value,
            err.to_string_with_precision(specs.precision),
        ])),
        None => Ok(Rendered::single(value)),
    }
}

fn registry() -> FormatterRegistry {
    let mut registry = FormatterRegistry::new();
    registry
        .register("Normal", OutputFormat::Text, normal)
        .register("Normal", OutputFormat::Html, normal)
        .register("ErrorBars", OutputFormat::Text, error_bars);
    registry
}

fn keys(names: &[Option<&str>]) -> Option<Vec<Option<String>>> {
    Some(names.iter().map(|k| k.map(str::to_string)).collect())
}

#[test]
fn test_padded_formatter_scenario() {
    let row = Row::new(vec![1.0, 2.0], keys(&[Some("Normal")]), None);

    assert_eq!(row.cells()[0].formatter(), Some("Normal"));
    assert_eq!(row.cells()[0].label(), Some(&ReportableQty::from_val(1.0)));
    assert_eq!(row.cells()[1].formatter(), None);
    assert_eq!(row.cells()[1].label(), Some(&ReportableQty::from_val(2.0)));

    let out = row
        .render(&registry(), &"text".into(), &RenderSpecs::new())
        .unwrap();
    assert_eq!(out, vec!["<1>", "2"]);
}

#[test]
fn test_add_then_render_scenario() {
    let mut row = Row::new(vec![1.0, 2.0], keys(&[Some("Normal")]), None);
    row.add(3.0, None, None);

    let out = row
        .render(&registry(), &"text".into(), &RenderSpecs::new())
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[2], "3");
}

#[test]
fn test_missing_formatter_same_as_explicit_none() {
    let padded = Row::new(vec![0.25, 0.5], keys(&[Some("Normal")]), None);
    let explicit = Row::new(vec![0.25, 0.5], keys(&[Some("Normal"), None]), None);
    assert_eq!(padded, explicit);

    let specs = RenderSpecs::new().with_precision(1);
    assert_eq!(
        padded.render(&registry(), &OutputFormat::Text, &specs).unwrap(),
        explicit.render(&registry(), &OutputFormat::Text, &specs).unwrap()
    );
}

#[test]
fn test_error_bars_expand_in_place() {
    let row = Row::new(
        vec![
            ReportableQty::from_val("Gx"),
            ReportableQty::from_val((0.991, 0.004)),
            ReportableQty::from_val(12),
        ],
        keys(&[None, Some("ErrorBars"), None]),
        None,
    );

    let specs = RenderSpecs::new().with_precision(3);
    let out = row.render(&registry(), &OutputFormat::Text, &specs).unwrap();
    assert_eq!(out, vec!["Gx", "0.991", "0.004", "12"]);
    assert!(out.len() > row.len());
}

#[test]
fn test_plain_rendering_for_html_escapes() {
    let row = Row::new(vec!["<rho>", "a & b"], None, None);
    let out = row
        .render(&registry(), &OutputFormat::Html, &RenderSpecs::new())
        .unwrap();
    assert_eq!(out, vec!["&lt;rho&gt;", "a &amp; b"]);
}

#[test]
fn test_unsupported_format_aborts_row() {
    let row = Row::new(vec![1.0, 2.0], keys(&[None, Some("ErrorBars")]), None);
    let err = row
        .render(&registry(), &OutputFormat::Latex, &RenderSpecs::new())
        .unwrap_err();
    assert!(matches!(err, ReportError::UnsupportedFormat { .. }));
}

#[test]
fn test_specs_from_config_reach_formatters() {
    let mut registry = registry();
    registry.register(
        "Column",
        OutputFormat::Text,
        |_qty: &ReportableQty, _label: &ReportableQty, specs: &RenderSpecs| {
            Ok(Rendered::single(specs.get_str("column").unwrap_or("?")))
        },
    );

    let specs = RenderSpecs::from_json(r#"{"precision": 2, "column": "Fidelity"}"#).unwrap();
    let row = Row::new(vec![0.12345, 1.0], keys(&[None, Some("Column")]), None);
    let out = row.render(&registry, &OutputFormat::Text, &specs).unwrap();
    assert_eq!(out, vec!["0.12", "Fidelity"]);
}

#[test]
fn test_normalization_is_stable_across_cells() {
    let row = Row::new(vec![(1.0, 0.5)], None, None);
    let held = row.cells()[0].data().clone();
    assert_eq!(ReportableQty::from_val(held.clone()), held);

    let rebuilt = Row::new(vec![held.clone()], None, None);
    assert_eq!(rebuilt.cells()[0].data(), &held);
    assert_eq!(held.value(), &QtyValue::Float(1.0));
}

#[test]
fn test_rows_render_from_several_threads() {
    let registry = registry();
    let rows: Vec<Row> = (0..4)
        .map(|i| Row::new(vec![i as f64, 0.5], keys(&[Some("Normal")]), None))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = rows
            .iter()
            .map(|row| {
                let registry = &registry;
                scope.spawn(move || row.render(registry, &OutputFormat::Text, &RenderSpecs::new()))
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let out = handle.join().unwrap().unwrap();
            assert_eq!(out, vec![format!("<{}>", i), "0.5".to_string()]);
        }
    });
}
