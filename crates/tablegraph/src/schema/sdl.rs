//! Renders the GraphQL type document.

use super::{ty::DECLARED_SCALARS, Column, Resolver, Table, TypeMapper, TypeRef};

pub(super) fn render(tables: &[Table], mapper: &TypeMapper) -> String {
    let mut blocks = vec![];

    let scalars: Vec<String> = DECLARED_SCALARS
        .iter()
        .copied()
        .chain(mapper.custom_scalars())
        .map(|name| format!("scalar {name}"))
        .collect();
    blocks.push(scalars.join("\n"));

    for table in tables {
        let fields: Vec<String> = table
            .columns
            .values()
            .filter(|column| column.export)
            .map(|column| field(&column.name, &[], &column.ty))
            .collect();
        blocks.push(block("type", &table.type_name, &fields));

        let inputs: Vec<String> = table
            .columns
            .values()
            .filter(|column| column.allow_input)
            .map(|column| field(&column.name, &[], &input_ty(column)))
            .collect();
        if !inputs.is_empty() {
            blocks.push(block("input", &table.input_type_name(), &inputs));
        }
    }

    let queries: Vec<String> = tables
        .iter()
        .flat_map(|table| table.queries.values())
        .map(operation)
        .collect();
    if !queries.is_empty() {
        blocks.push(block("type", "Query", &queries));
    }

    let mutations: Vec<String> = tables
        .iter()
        .flat_map(|table| table.mutations.values())
        .map(operation)
        .collect();
    if !mutations.is_empty() {
        blocks.push(block("type", "Mutation", &mutations));
    }

    let mut sdl = blocks.join("\n\n");
    sdl.push('\n');
    sdl
}

fn block(keyword: &str, name: &str, fields: &[String]) -> String {
    let mut out = format!("{keyword} {name} {{\n");
    for field in fields {
        out.push_str("  ");
        out.push_str(field);
        out.push('\n');
    }
    out.push('}');
    out
}

fn operation(resolver: &Resolver) -> String {
    let args: Vec<(&str, &TypeRef)> = resolver
        .args
        .iter()
        .map(|arg| (arg.name.as_str(), &arg.ty))
        .collect();
    field(&resolver.name, &args, &resolver.ty)
}

fn field(name: &str, args: &[(&str, &TypeRef)], ty: &TypeRef) -> String {
    if args.is_empty() {
        return format!("{name}: {ty}");
    }

    let args: Vec<String> = args
        .iter()
        .map(|(name, ty)| format!("{name}: {ty}"))
        .collect();
    format!("{name}({}): {ty}", args.join(", "))
}

/// Relationship fields take the input variant of their target type.
fn input_ty(column: &Column) -> TypeRef {
    match column.relationship {
        Some(_) => TypeRef {
            name: format!("Input{}", column.ty.name),
            ..column.ty.clone()
        },
        None => column.ty.clone(),
    }
}
