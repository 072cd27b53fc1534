//! Stateful renderer for Java source text.
//!
//! [`SourceWriter`] is a forward-only cursor over an output stream. Callers
//! drive it with paired `begin_*`/`end_*` operations plus per-element calls
//! in between; the writer tracks indentation and an explicit stack of open
//! scopes so that commas, braces, and indentation always come out balanced.
//! Misuse of the pairing contract is reported as
//! [`EmitError::Protocol`](crate::error::EmitError) instead of ever
//! producing malformed output.

use std::io::Write;

use crate::error::{EmitError, EmitResult};
use crate::model::{Modifier, TypeRef};

/// Indentation style for generated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// 2 spaces per level.
    Spaces2,
    /// 4 spaces per level.
    #[default]
    Spaces4,
    /// One tab per level.
    Tabs,
}

impl IndentStyle {
    /// The indentation unit as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// The indentation for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Line ending style for generated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style `\n`.
    Lf,
    /// Windows-style `\r\n`.
    #[default]
    CrLf,
}

impl LineEnding {
    /// The line ending as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// One open construct the writer is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Between `begin_class` and `begin_class_body`.
    ClassHeader { extended: bool, implements_open: bool },
    /// Between `begin_interface` and `begin_interface_body`.
    InterfaceHeader,
    ClassBody,
    InterfaceBody,
    /// Open parameter list of a constructor or method declaration.
    Signature { first: bool, in_interface: bool },
    /// Open argument list of a call statement.
    Call { first: bool },
    /// Statement started but not yet terminated, e.g. an open `return`.
    Statement,
    /// Statement-level body of a constructor or method.
    Body,
    /// Body of an enhanced for-loop.
    ForEach,
}

impl Scope {
    fn describe(&self) -> &'static str {
        match self {
            Scope::ClassHeader { .. } => "class header",
            Scope::InterfaceHeader => "interface header",
            Scope::ClassBody => "class body",
            Scope::InterfaceBody => "interface body",
            Scope::Signature { .. } => "signature",
            Scope::Call { .. } => "call arguments",
            Scope::Statement => "open statement",
            Scope::Body => "member body",
            Scope::ForEach => "for-each body",
        }
    }
}

/// Stateful, indentation-aware writer producing Java source text.
///
/// # Example
///
/// ```
/// use javagen::model::Modifier;
/// use javagen::writer::{LineEnding, SourceWriter};
///
/// let mut writer = SourceWriter::new(Vec::new()).with_line_ending(LineEnding::Lf);
/// writer.package_declaration("com.example")?;
/// writer.begin_class("Widget", "com.example.Processor", &[Modifier::Public])?;
/// writer.begin_class_body()?;
/// writer.end_class()?;
///
/// let source = String::from_utf8(writer.finish()?)?;
/// assert!(source.contains("public class Widget {"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SourceWriter<W: Write> {
    out: W,
    indent_style: IndentStyle,
    line_ending: LineEnding,
    indent: usize,
    scopes: Vec<Scope>,
}

impl<W: Write> SourceWriter<W> {
    /// Create a writer with the default four-space, CRLF rendering.
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent_style: IndentStyle::default(),
            line_ending: LineEnding::default(),
            indent: 0,
            scopes: Vec::new(),
        }
    }

    /// Set the indentation style.
    pub fn with_indent_style(mut self, style: IndentStyle) -> Self {
        self.indent_style = style;
        self
    }

    /// Set the line ending style.
    pub fn with_line_ending(mut self, ending: LineEnding) -> Self {
        self.line_ending = ending;
        self
    }

    /// Consume the writer, verifying every scope was closed.
    pub fn finish(self) -> EmitResult<W> {
        if self.scopes.is_empty() {
            Ok(self.out)
        } else {
            Err(EmitError::UnclosedScopes {
                depth: self.scopes.len(),
            })
        }
    }

    // ------------------------------------------------------------------
    // Top-level and type declarations
    // ------------------------------------------------------------------

    /// Write the package declaration; a type in the default package (empty
    /// name) gets none.
    pub fn package_declaration(&mut self, package: &str) -> EmitResult<()> {
        self.require("package_declaration", "the top level", self.scopes.is_empty())?;
        if package.is_empty() {
            return Ok(());
        }
        self.raw("package ")?;
        self.raw(package)?;
        self.raw(";")?;
        self.newline()?;
        self.newline()
    }

    /// Write a full annotation line, e.g. `@javax.inject.Singleton`.
    pub fn annotation(&mut self, annotation: &str) -> EmitResult<()> {
        let valid = self.scopes.is_empty()
            || matches!(
                self.scopes.last(),
                Some(Scope::ClassBody) | Some(Scope::InterfaceBody)
            );
        self.require("annotation", "the top level or an open type body", valid)?;
        self.write_indent()?;
        self.raw(annotation)?;
        self.newline()
    }

    /// Open a class declaration. The provenance string is recorded in a
    /// `@javax.annotation.Generated` annotation above the declaration.
    pub fn begin_class(
        &mut self,
        name: &str,
        provenance: &str,
        modifiers: &[Modifier],
    ) -> EmitResult<()> {
        self.require("begin_class", "the top level", self.scopes.is_empty())?;
        self.generated_annotation(provenance)?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw("class ")?;
        self.raw(name)?;
        self.indent += 1;
        self.scopes.push(Scope::ClassHeader {
            extended: false,
            implements_open: false,
        });
        Ok(())
    }

    /// Name the superclass. Must come before any `implement_interface`.
    pub fn extend_class(&mut self, superclass: &str) -> EmitResult<()> {
        let valid = matches!(
            self.scopes.last(),
            Some(Scope::ClassHeader {
                extended: false,
                implements_open: false,
            })
        );
        self.require(
            "extend_class",
            "an open class header without extends or implements",
            valid,
        )?;
        if let Some(Scope::ClassHeader { extended, .. }) = self.scopes.last_mut() {
            *extended = true;
        }
        self.raw(" extends ")?;
        self.raw(superclass)
    }

    /// Add one implemented interface to the header's `implements` list.
    pub fn implement_interface(&mut self, interface: &str) -> EmitResult<()> {
        let open = match self.scopes.last() {
            Some(Scope::ClassHeader { implements_open, .. }) => *implements_open,
            _ => {
                return Err(self.protocol_err("implement_interface", "an open class header"));
            }
        };
        if let Some(Scope::ClassHeader { implements_open, .. }) = self.scopes.last_mut() {
            *implements_open = true;
        }
        if open {
            self.raw(", ")?;
        } else {
            self.raw(" implements ")?;
        }
        self.raw(interface)
    }

    /// Close the class header and open its body.
    pub fn begin_class_body(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::ClassHeader { .. }));
        self.require("begin_class_body", "an open class header", valid)?;
        self.scopes.pop();
        self.scopes.push(Scope::ClassBody);
        self.raw(" {")?;
        self.newline()?;
        self.newline()
    }

    /// Open an interface declaration, either top-level or nested in a class
    /// body.
    pub fn begin_interface(
        &mut self,
        name: &str,
        provenance: &str,
        modifiers: &[Modifier],
    ) -> EmitResult<()> {
        let valid = self.scopes.is_empty() || matches!(self.scopes.last(), Some(Scope::ClassBody));
        self.require("begin_interface", "the top level or an open class body", valid)?;
        self.generated_annotation(provenance)?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw("interface ")?;
        self.raw(name)?;
        self.indent += 1;
        self.scopes.push(Scope::InterfaceHeader);
        Ok(())
    }

    /// Close the interface header and open its body.
    pub fn begin_interface_body(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::InterfaceHeader));
        self.require("begin_interface_body", "an open interface header", valid)?;
        self.scopes.pop();
        self.scopes.push(Scope::InterfaceBody);
        self.raw(" {")?;
        self.newline()?;
        self.newline()
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// Write a field declaration followed by a blank line.
    pub fn field(&mut self, ty: &TypeRef, name: &str, modifiers: &[Modifier]) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::ClassBody));
        self.require("field", "an open class body", valid)?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw(ty.as_str())?;
        self.raw(" ")?;
        self.raw(name)?;
        self.raw(";")?;
        self.newline()?;
        self.newline()
    }

    /// Open a constructor declaration and its parameter list.
    pub fn begin_constructor(&mut self, name: &str, modifiers: &[Modifier]) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::ClassBody));
        self.require("begin_constructor", "an open class body", valid)?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw(name)?;
        self.raw("(")?;
        self.indent += 2;
        self.scopes.push(Scope::Signature {
            first: true,
            in_interface: false,
        });
        Ok(())
    }

    /// Open a method declaration and its parameter list.
    pub fn begin_method(
        &mut self,
        return_type: &TypeRef,
        name: &str,
        modifiers: &[Modifier],
    ) -> EmitResult<()> {
        let in_interface = match self.scopes.last() {
            Some(Scope::ClassBody) => false,
            Some(Scope::InterfaceBody) => true,
            _ => {
                return Err(self.protocol_err("begin_method", "an open class or interface body"));
            }
        };
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw(return_type.as_str())?;
        self.raw(" ")?;
        self.raw(name)?;
        self.raw("(")?;
        self.indent += 2;
        self.scopes.push(Scope::Signature {
            first: true,
            in_interface,
        });
        Ok(())
    }

    /// Write one parameter on its own line, comma-separated from the
    /// previous one. `annotations` is pre-joined text, empty for none.
    pub fn parameter(
        &mut self,
        annotations: &str,
        ty: &TypeRef,
        name: &str,
        modifiers: &[Modifier],
    ) -> EmitResult<()> {
        let was_first = self.take_signature_first("parameter")?;
        if !was_first {
            self.raw(",")?;
        }
        self.newline()?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        if !annotations.is_empty() {
            self.raw(annotations)?;
            self.raw(" ")?;
        }
        self.raw(ty.as_str())?;
        self.raw(" ")?;
        self.raw(name)
    }

    /// Close a class member's parameter list, write the optional `throws`
    /// clause, and open the member body.
    pub fn end_signature(&mut self, thrown: &[TypeRef]) -> EmitResult<()> {
        let valid = matches!(
            self.scopes.last(),
            Some(Scope::Signature {
                in_interface: false,
                ..
            })
        );
        self.require("end_signature", "an open class member signature", valid)?;
        self.scopes.pop();
        self.raw(")")?;
        self.write_throws(thrown)?;
        self.raw(" {")?;
        self.newline()?;
        self.indent -= 1;
        self.scopes.push(Scope::Body);
        Ok(())
    }

    /// Close an interface method's parameter list with `;` — no body.
    pub fn end_signature_abstract(&mut self, thrown: &[TypeRef]) -> EmitResult<()> {
        let valid = matches!(
            self.scopes.last(),
            Some(Scope::Signature {
                in_interface: true,
                ..
            })
        );
        self.require(
            "end_signature_abstract",
            "an open interface method signature",
            valid,
        )?;
        self.scopes.pop();
        self.raw(")")?;
        self.write_throws(thrown)?;
        self.raw(";")?;
        self.newline()?;
        self.indent -= 2;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Open a `super(...)` constructor call.
    pub fn begin_super_call(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body));
        self.require("begin_super_call", "an open member body", valid)?;
        self.write_indent()?;
        self.raw("super(")?;
        self.scopes.push(Scope::Call { first: true });
        Ok(())
    }

    /// Open a `super.method(...)` call.
    pub fn begin_super_method_call(&mut self, method: &str) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body));
        self.require("begin_super_method_call", "an open member body", valid)?;
        self.write_indent()?;
        self.raw("super.")?;
        self.raw(method)?;
        self.raw("(")?;
        self.scopes.push(Scope::Call { first: true });
        Ok(())
    }

    /// Open a call statement on any target, e.g. `listeners.add(`.
    pub fn begin_call(&mut self, target: &str) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body) | Some(Scope::ForEach));
        self.require("begin_call", "an open member body", valid)?;
        self.write_indent()?;
        self.raw(target)?;
        self.raw("(")?;
        self.scopes.push(Scope::Call { first: true });
        Ok(())
    }

    /// Write one call argument, `, `-separated from the previous one.
    pub fn argument(&mut self, expression: &str) -> EmitResult<()> {
        let was_first = self.take_call_first("argument")?;
        if !was_first {
            self.raw(", ")?;
        }
        self.raw(expression)
    }

    /// Close a call statement with `);`.
    pub fn end_call(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Call { .. }));
        self.require("end_call", "an open call argument list", valid)?;
        self.scopes.pop();
        self.raw(");")?;
        self.newline()
    }

    /// Write `this.<field> = <value>;`.
    pub fn field_assignment(&mut self, field: &str, value: &str) -> EmitResult<()> {
        let text = format!("this.{field} = {value};");
        self.statement("field_assignment", &text)
    }

    /// Write `<target> = <value>;`.
    pub fn assignment(&mut self, target: &str, value: &str) -> EmitResult<()> {
        let text = format!("{target} = {value};");
        self.statement("assignment", &text)
    }

    /// Write a local declaration with an initializer, e.g.
    /// `final String oldValue = getName();`.
    pub fn local_declaration(
        &mut self,
        ty: &TypeRef,
        name: &str,
        value: &str,
        modifiers: &[Modifier],
    ) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body) | Some(Scope::ForEach));
        self.require("local_declaration", "an open member body", valid)?;
        self.write_indent()?;
        self.write_modifiers(modifiers)?;
        self.raw(ty.as_str())?;
        self.raw(" ")?;
        self.raw(name)?;
        self.raw(" = ")?;
        self.raw(value)?;
        self.raw(";")?;
        self.newline()
    }

    /// Open a `return ` statement; follow with [`new_instance`] and
    /// [`end_statement`].
    ///
    /// [`new_instance`]: SourceWriter::new_instance
    /// [`end_statement`]: SourceWriter::end_statement
    pub fn begin_return(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body));
        self.require("begin_return", "an open member body", valid)?;
        self.write_indent()?;
        self.raw("return ")?;
        self.scopes.push(Scope::Statement);
        Ok(())
    }

    /// Write `new <Class>(...)` with each argument on its own line.
    pub fn new_instance(&mut self, class: &str, arguments: &[&str]) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Statement));
        self.require("new_instance", "an open statement", valid)?;
        self.raw("new ")?;
        self.raw(class)?;
        self.raw("(")?;
        if !arguments.is_empty() {
            self.indent += 2;
            for (index, argument) in arguments.iter().enumerate() {
                if index > 0 {
                    self.raw(",")?;
                }
                self.newline()?;
                self.write_indent()?;
                self.raw(argument)?;
            }
            self.indent -= 2;
        }
        self.raw(")")
    }

    /// Terminate an open statement with `;`.
    pub fn end_statement(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Statement));
        self.require("end_statement", "an open statement", valid)?;
        self.scopes.pop();
        self.raw(";")?;
        self.newline()
    }

    /// Open an enhanced for-loop, `for (<ty> <variable> : <iterable>) {`.
    pub fn begin_for_each(&mut self, ty: &str, variable: &str, iterable: &str) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body) | Some(Scope::ForEach));
        self.require("begin_for_each", "an open member body", valid)?;
        self.write_indent()?;
        self.raw("for (")?;
        self.raw(ty)?;
        self.raw(" ")?;
        self.raw(variable)?;
        self.raw(" : ")?;
        self.raw(iterable)?;
        self.raw(") {")?;
        self.newline()?;
        self.indent += 1;
        self.scopes.push(Scope::ForEach);
        Ok(())
    }

    /// Close an enhanced for-loop.
    pub fn end_for_each(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::ForEach));
        self.require("end_for_each", "an open for-each body", valid)?;
        self.scopes.pop();
        self.indent -= 1;
        self.write_indent()?;
        self.raw("}")?;
        self.newline()
    }

    // ------------------------------------------------------------------
    // Block closers
    // ------------------------------------------------------------------

    /// Close a constructor or method body.
    pub fn end_block(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body));
        self.require("end_block", "an open member body", valid)?;
        self.scopes.pop();
        self.close_brace_with_blank()
    }

    /// Close a class body.
    pub fn end_class(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::ClassBody));
        self.require("end_class", "an open class body", valid)?;
        self.scopes.pop();
        self.close_brace_with_blank()
    }

    /// Close an interface body.
    pub fn end_interface(&mut self) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::InterfaceBody));
        self.require("end_interface", "an open interface body", valid)?;
        self.scopes.pop();
        self.close_brace_with_blank()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn raw(&mut self, text: &str) -> EmitResult<()> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn newline(&mut self) -> EmitResult<()> {
        let ending = self.line_ending.as_str();
        self.raw(ending)
    }

    fn write_indent(&mut self) -> EmitResult<()> {
        let pad = self.indent_style.indent(self.indent);
        self.raw(&pad)
    }

    fn write_modifiers(&mut self, modifiers: &[Modifier]) -> EmitResult<()> {
        for modifier in modifiers {
            self.raw(modifier.as_str())?;
            self.raw(" ")?;
        }
        Ok(())
    }

    fn write_throws(&mut self, thrown: &[TypeRef]) -> EmitResult<()> {
        if thrown.is_empty() {
            return Ok(());
        }
        self.raw(" throws")?;
        for (index, ty) in thrown.iter().enumerate() {
            if index > 0 {
                self.raw(",")?;
            }
            self.newline()?;
            self.write_indent()?;
            self.raw(ty.as_str())?;
        }
        Ok(())
    }

    fn generated_annotation(&mut self, provenance: &str) -> EmitResult<()> {
        self.write_indent()?;
        self.raw("@javax.annotation.Generated(\"")?;
        self.raw(provenance)?;
        self.raw("\")")?;
        self.newline()
    }

    fn close_brace_with_blank(&mut self) -> EmitResult<()> {
        self.indent -= 1;
        self.write_indent()?;
        self.raw("}")?;
        self.newline()?;
        self.newline()
    }

    fn statement(&mut self, operation: &'static str, text: &str) -> EmitResult<()> {
        let valid = matches!(self.scopes.last(), Some(Scope::Body) | Some(Scope::ForEach));
        self.require(operation, "an open member body", valid)?;
        self.write_indent()?;
        self.raw(text)?;
        self.newline()
    }

    fn take_signature_first(&mut self, operation: &'static str) -> EmitResult<bool> {
        if let Some(Scope::Signature { first, .. }) = self.scopes.last_mut() {
            let was_first = *first;
            *first = false;
            return Ok(was_first);
        }
        Err(self.protocol_err(operation, "an open signature"))
    }

    fn take_call_first(&mut self, operation: &'static str) -> EmitResult<bool> {
        if let Some(Scope::Call { first }) = self.scopes.last_mut() {
            let was_first = *first;
            *first = false;
            return Ok(was_first);
        }
        Err(self.protocol_err(operation, "an open call argument list"))
    }

    fn require(&self, operation: &'static str, expected: &'static str, valid: bool) -> EmitResult<()> {
        if valid {
            Ok(())
        } else {
            Err(self.protocol_err(operation, expected))
        }
    }

    fn protocol_err(&self, operation: &'static str, expected: &'static str) -> EmitError {
        let found = self
            .scopes
            .last()
            .map(|scope| scope.describe().to_string())
            .unwrap_or_else(|| "top level".to_string());
        EmitError::Protocol {
            operation,
            expected,
            found,
        }
    }
}
