//! Java emitter.
//!
//! One file per interface, per record and for the shared `Wither` contract.
//! The nullability marker is written fully qualified at every site so no
//! import can clash with a generated name.

use crate::docs;
use crate::error::EmitError;
use crate::ir::{InterfaceDescriptor, RecordDescriptor, RecordModel};
use crate::schema::{ClassId, SchemaGraph, TypeRef};
use crate::traits::{EmitOptions, Emitter, SourceFile};
use crate::wither::{MementoDescriptor, WitherContract};
use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::path::PathBuf;

/// Static instance of the Java emitter for registry.
pub static JAVA_EMITTER: JavaEmitter = JavaEmitter;

/// Java emitter implementing the Emitter trait.
pub struct JavaEmitter;

impl Emitter for JavaEmitter {
    fn name(&self) -> &'static str {
        "java"
    }

    fn language(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn emit(
        &self,
        graph: &SchemaGraph,
        model: &RecordModel,
        options: &EmitOptions,
    ) -> Result<Vec<SourceFile>, EmitError> {
        generate_java(graph, model, options)
    }
}

/// Render every interface and record of `model`, plus `Wither` when present.
#[tracing::instrument(level = "debug", skip_all, fields(package = ?options.package))]
pub fn generate_java(
    graph: &SchemaGraph,
    model: &RecordModel,
    options: &EmitOptions,
) -> Result<Vec<SourceFile>, EmitError> {
    let package = options.package.as_deref();
    let mut files = Vec::new();

    for resolved in &model.classes {
        if let Some(interface) = &resolved.interface {
            let mut writer = JavaWriter::new(graph, model);
            writer.write_interface(interface)?;
            files.push(writer.finish(&interface.name, package)?);
        }
        if let Some(record) = &resolved.record {
            let mut writer = JavaWriter::new(graph, model);
            writer.write_record(record, model.wither.as_ref())?;
            files.push(writer.finish(&record.name, package)?);
        }
    }

    if let Some(contract) = &model.wither {
        let mut writer = JavaWriter::new(graph, model);
        writer.write_contract(contract)?;
        files.push(writer.finish(&contract.name, package)?);
    }

    tracing::debug!(files = files.len(), "java sources rendered");
    Ok(files)
}

/// Writes one compilation unit.
struct JavaWriter<'a> {
    graph: &'a SchemaGraph,
    model: &'a RecordModel,
    output: String,
    indent: usize,
    imports: BTreeSet<&'static str>,
}

impl<'a> JavaWriter<'a> {
    fn new(graph: &'a SchemaGraph, model: &'a RecordModel) -> Self {
        Self {
            graph,
            model,
            output: String::new(),
            indent: 0,
            imports: BTreeSet::new(),
        }
    }

    /// Prepend the package and import header to the body.
    fn finish(self, type_name: &str, package: Option<&str>) -> Result<SourceFile, fmt::Error> {
        let mut contents = String::new();
        let mut path = PathBuf::new();
        if let Some(package) = package {
            writeln!(contents, "package {package};")?;
            contents.push('\n');
            path.extend(package.split('.'));
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                writeln!(contents, "import {import};")?;
            }
            contents.push('\n');
        }
        contents.push_str(&self.output);
        path.push(format!("{type_name}.java"));
        Ok(SourceFile { path, contents })
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    fn indent_str(&self) -> String {
        "  ".repeat(self.indent)
    }

    fn write_doc(&mut self, doc: Option<&str>) {
        if let Some(doc) = doc {
            let lines: Vec<String> = doc.lines().map(|l| l.trim_end().to_string()).collect();
            let block = docs::javadoc(&lines, &self.indent_str());
            self.output.push_str(&block);
        }
    }

    fn write_interface(&mut self, interface: &InterfaceDescriptor) -> fmt::Result {
        self.write_doc(interface.doc.as_deref());
        write!(self.output, "public interface {}", interface.name)?;
        if let Some(parent) = &interface.extends {
            write!(self.output, " extends {parent}")?;
        }
        self.output.push_str(" {\n");

        self.indent += 1;
        for (i, method) in interface.methods.iter().enumerate() {
            if i > 0 && method.doc.is_some() {
                self.output.push('\n');
            }
            self.write_doc(method.doc.as_deref());
            let ty = self.java_type(&method.ty, method.nullable);
            self.write_indent();
            writeln!(self.output, "{ty} {}();", method.name)?;
        }
        self.indent -= 1;

        self.output.push_str("}\n");
        Ok(())
    }

    fn write_record(
        &mut self,
        record: &RecordDescriptor,
        contract: Option<&WitherContract>,
    ) -> fmt::Result {
        if let Some(doc) = record.doc.to_javadoc(&self.indent_str()) {
            self.output.push_str(&doc);
        }
        for decoration in &record.decorations {
            writeln!(self.output, "@{}", decoration.annotation)?;
        }

        let components: Vec<String> = record
            .components
            .iter()
            .map(|c| format!("{} {}", self.java_type(&c.ty, c.nullable), c.name))
            .collect();
        write!(
            self.output,
            "public record {}({})",
            record.name,
            components.join(", ")
        )?;

        let mut implements = record.implements.clone();
        let wither = record.memento.as_ref().zip(contract);
        if let Some((memento, contract)) = wither {
            implements.push(format!(
                "{}<{}, {}>",
                contract.name,
                record.name,
                memento.qualified_name()
            ));
        }
        if !implements.is_empty() {
            write!(self.output, " implements {}", implements.join(", "))?;
        }

        match wither {
            None => self.output.push_str(" {\n}\n"),
            Some((memento, contract)) => {
                self.output.push_str(" {\n");
                self.indent += 1;
                self.write_entry_point(record, memento, contract)?;
                self.output.push('\n');
                self.write_memento(record, memento)?;
                self.indent -= 1;
                self.output.push_str("}\n");
            }
        }
        Ok(())
    }

    /// `with`: stage from `this`, run the setter, finalize.
    fn write_entry_point(
        &mut self,
        record: &RecordDescriptor,
        memento: &MementoDescriptor,
        contract: &WitherContract,
    ) -> fmt::Result {
        self.imports.insert("java.util.function.Consumer");
        let m = &contract.nullability_marker;

        self.write_indent();
        self.output.push_str("@Override\n");
        self.write_indent();
        writeln!(
            self.output,
            "public @{m} {} {}(@{m} Consumer<@{m} {}> setter) {{",
            record.name, memento.entry_point, memento.name
        )?;
        self.indent += 1;
        self.write_indent();
        writeln!(self.output, "var memento = new {}(this);", memento.name)?;
        self.write_indent();
        self.output.push_str("setter.accept(memento);\n");
        self.write_indent();
        writeln!(self.output, "return memento.{}();", memento.finalize)?;
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    fn write_memento(&mut self, record: &RecordDescriptor, memento: &MementoDescriptor) -> fmt::Result {
        self.write_indent();
        writeln!(self.output, "public static final class {} {{", memento.name)?;
        self.indent += 1;

        for field in &memento.fields {
            let ty = self.java_type(&field.ty, field.nullable);
            self.write_indent();
            writeln!(self.output, "public {ty} {};", field.name)?;
        }
        if !memento.fields.is_empty() {
            self.output.push('\n');
        }

        self.write_indent();
        writeln!(self.output, "private {}({} source) {{", memento.name, record.name)?;
        self.indent += 1;
        for field in &memento.fields {
            self.write_indent();
            writeln!(self.output, "this.{0} = source.{0}();", field.name)?;
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n\n");

        let arguments: Vec<&str> = memento.fields.iter().map(|f| f.name.as_str()).collect();
        self.write_indent();
        writeln!(self.output, "private {} {}() {{", record.name, memento.finalize)?;
        self.indent += 1;
        self.write_indent();
        writeln!(
            self.output,
            "return new {}({});",
            record.name,
            arguments.join(", ")
        )?;
        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");

        self.indent -= 1;
        self.write_indent();
        self.output.push_str("}\n");
        Ok(())
    }

    fn write_contract(&mut self, contract: &WitherContract) -> fmt::Result {
        self.imports.insert("java.util.function.Consumer");
        let m = &contract.nullability_marker;
        let (r, s) = (&contract.record_param, &contract.staging_param);

        let doc = [
            "Derives changed copies of an immutable record.".to_string(),
            String::new(),
            format!("@param <{r}> the record type"),
            format!("@param <{s}> the staging type handed to the setter"),
        ];
        self.output.push_str(&docs::javadoc(&doc, ""));
        writeln!(
            self.output,
            "public interface {}<@{m} {r} extends @{m} Record, @{m} {s}> {{",
            contract.name
        )?;
        self.indent += 1;
        self.write_indent();
        writeln!(
            self.output,
            "@{m} {r} {}(@{m} Consumer<@{m} {s}> setter);",
            contract.method
        )?;
        self.indent -= 1;
        self.output.push_str("}\n");
        Ok(())
    }

    /// Java type for a component. Nullable primitives are boxed.
    fn java_type(&mut self, ty: &TypeRef, nullable: bool) -> String {
        self.render_type(ty, nullable)
    }

    fn render_type(&mut self, ty: &TypeRef, boxed: bool) -> String {
        match ty {
            TypeRef::Boolean => primitive("boolean", "Boolean", boxed),
            TypeRef::Int => primitive("long", "Long", boxed),
            TypeRef::Float => primitive("double", "Double", boxed),
            TypeRef::String => "String".to_string(),
            TypeRef::Any => "Object".to_string(),
            TypeRef::List(element) => {
                self.imports.insert("java.util.List");
                format!("List<{}>", self.render_type(element, true))
            }
            TypeRef::Set(element) => {
                self.imports.insert("java.util.Set");
                format!("Set<{}>", self.render_type(element, true))
            }
            TypeRef::Map { key, value } => {
                self.imports.insert("java.util.Map");
                let key = self.render_type(key, true);
                let value = self.render_type(value, true);
                format!("Map<{key}, {value}>")
            }
            TypeRef::Nullable(inner) => self.render_type(inner, true),
            TypeRef::Class(id) => self.class_type(*id),
        }
    }

    fn class_type(&self, id: ClassId) -> String {
        self.model
            .type_name(id)
            .unwrap_or(self.graph.get(id).name.as_str())
            .to_string()
    }
}

fn primitive(unboxed: &str, boxed_name: &str, boxed: bool) -> String {
    let name = if boxed { boxed_name } else { unboxed };
    name.to_string()
}
