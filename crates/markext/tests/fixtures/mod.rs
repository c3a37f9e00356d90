use markext::prelude::*;

pub const THEMES_NS: &str = "clr-namespace:Acme.Themes;assembly=Acme.Themes";

#[derive(Debug, Default)]
pub struct ComponentResourceKey {
    pub type_in_target_assembly: Option<TypeRef>,
    pub resource_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct TypeExtension {
    pub type_name: Option<String>,
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Default, PartialEq)]
pub struct StaticExtension {
    pub member: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brush(pub String);

#[derive(Debug, Default, PartialEq)]
pub struct Button {
    pub foreground: Option<Brush>,
    pub width: f64,
    pub enabled: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct Theme;

/// Markup types of a small presentation framework plus the `x:` extensions.
pub fn types() -> TypeRegistry {
    let mut types = TypeRegistry::with_system_types();
    let string = system(&types, "String");
    let object = system(&types, "Object");
    let type_ = system(&types, "Type");
    let double = system(&types, "Double");
    let boolean = system(&types, "Boolean");

    types.register(
        TypeDescriptor::builder::<ComponentResourceKey>("ComponentResourceKey", PRESENTATION_NS)
            .constructor(&[], |_| Ok(ComponentResourceKey::default()))
            .constructor(&[&type_, &object], |args| {
                Ok(ComponentResourceKey {
                    type_in_target_assembly: Some(args.type_ref()?),
                    resource_id: args.next_value()?.into_opt_string()?,
                })
            })
            .property("TypeInTargetAssembly", &type_, |key, v| {
                key.type_in_target_assembly = Some(v.into_type()?);
                Ok(())
            })
            .property("ResourceId", &object, |key, v| {
                key.resource_id = v.into_opt_string()?;
                Ok(())
            })
            .build(),
    );

    types.register(
        TypeDescriptor::builder::<TypeExtension>("TypeExtension", XAML_NS)
            .constructor(&[], |_| Ok(TypeExtension::default()))
            .constructor(&[&string], |args| Ok(TypeExtension { type_name: Some(args.string()?), ty: None }))
            .property("TypeName", &string, |ext, v| {
                ext.type_name = v.into_opt_string()?;
                Ok(())
            })
            .property("Type", &type_, |ext, v| {
                ext.ty = Some(v.into_type()?);
                Ok(())
            })
            .build(),
    );

    types.register(
        TypeDescriptor::builder::<StaticExtension>("StaticExtension", XAML_NS)
            .constructor(&[], |_| Ok(StaticExtension::default()))
            .constructor(&[&string], |args| Ok(StaticExtension { member: Some(args.string()?) }))
            .property("Member", &string, |ext, v| {
                ext.member = v.into_opt_string()?;
                Ok(())
            })
            .build(),
    );

    let brush = types.register(TypeDescriptor::scalar("Brush", PRESENTATION_NS, TypeKind::Convertible));
    types.register(
        TypeDescriptor::builder::<Button>("Button", PRESENTATION_NS)
            .constructor(&[], |_| Ok(Button::default()))
            .property("Foreground", &brush, |b, v| {
                b.foreground = Some(v.downcast()?);
                Ok(())
            })
            .property("Width", &double, |b, v| {
                b.width = v.downcast()?;
                Ok(())
            })
            .property("IsEnabled", &boolean, |b, v| {
                b.enabled = v.downcast()?;
                Ok(())
            })
            .build(),
    );

    types.register(
        TypeDescriptor::builder::<Theme>("Theme", THEMES_NS)
            .constructor(&[], |_| Ok(Theme))
            .build(),
    );
    types
}

/// System converters plus a named-colour `Brush` converter.
pub fn conversions(types: &TypeRegistry) -> ConversionRegistry {
    let mut conversions = ConversionRegistry::with_system_converters(types);
    let brush = types.find_type(PRESENTATION_NS, "Brush").expect("Brush registered");
    conversions.register(&brush, |s| {
        let s = s.trim();
        match s {
            "Red" | "Green" | "Blue" | "Transparent" => Ok(Value::boxed(Brush(s.to_string()))),
            _ if s.starts_with('#') => Ok(Value::boxed(Brush(s.to_string()))),
            _ => anyhow::bail!("unknown colour {s:?}"),
        }
    });
    conversions
}

pub fn system(types: &TypeRegistry, name: &str) -> TypeRef {
    types.system(name).expect("system type registered")
}
