use serde_json::Value;

#[test]
fn openapi_exposes_can_modify_on_auth_payloads() -> anyhow::Result<()> {
    // Build the OpenAPI document the same way the server does
    let doc = regional_invest::docs::build_openapi(8000);
    let v = serde_json::to_value(&doc)?;

    let schemas = v
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .expect("components.schemas must exist");

    for name in ["AuthResponse", "MeResponse", "SharedProps"] {
        let props = schemas
            .get(name)
            .and_then(|s| s.get("properties"))
            .and_then(Value::as_object)
            .unwrap_or_else(|| panic!("components.schemas.{name}.properties must exist"));
        assert!(props.contains_key("can_modify"), "OpenAPI {} schema missing 'can_modify'", name);
    }

    let role_props = schemas["Role"]["properties"].as_object().expect("Role properties");
    assert!(role_props.contains_key("name"));
    assert!(role_props.contains_key("display_name"));

    Ok(())
}

#[test]
fn listings_document_the_envelope_and_gate_rejection() -> anyhow::Result<()> {
    let v = serde_json::to_value(regional_invest::docs::build_openapi(8000))?;

    let listing = &v["components"]["schemas"]["InvestmentProjectListing"]["properties"];
    assert!(listing.get("can_modify").is_some(), "listing schema missing 'can_modify': {listing}");
    assert!(listing.get("data").is_some());

    let responses = &v["paths"]["/investment-projects"]["get"]["responses"];
    assert_eq!(
        responses["200"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/InvestmentProjectListing"
    );

    for (path, method) in [
        ("/investment-projects", "get"),
        ("/investment-projects", "post"),
        ("/regions/{id}", "delete"),
        ("/users/{id}", "put"),
        ("/roles", "get"),
    ] {
        assert!(
            v["paths"][path][method]["responses"].get("403").is_some(),
            "{method} {path} does not document the 403 rejection"
        );
    }

    Ok(())
}
