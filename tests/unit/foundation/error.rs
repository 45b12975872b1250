use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PixmorphError::input("x").to_string().contains("input error:"));
    assert!(
        PixmorphError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PixmorphError::computation("x")
            .to_string()
            .contains("computation error:")
    );
    assert!(
        PixmorphError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PixmorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_converts_via_question_mark() {
    fn fails() -> PixmorphResult<()> {
        Err(anyhow::anyhow!("inner failure"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert!(matches!(err, PixmorphError::Other(_)));
    assert!(err.to_string().contains("inner failure"));
}
