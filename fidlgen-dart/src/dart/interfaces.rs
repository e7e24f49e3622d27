//! Protocol compilation.

use super::indent_entries;
use super::types::{NullabilityOverride, TypeResolver};
use crate::compiler::Compiler;
use crate::error::Result;
use crate::names::{self, NameContext};
use crate::tree::{Interface, Method, Parameter};
use fidlgen_ir::{InterfaceDecl, Method as IrMethod, Parameter as IrParameter};

/// Compiles protocols.
pub struct InterfaceCompiler<'c, 'a> {
    compiler: &'c Compiler<'a>,
}

impl<'c, 'a> InterfaceCompiler<'c, 'a> {
    /// Creates a new interface compiler.
    #[must_use]
    pub fn new(compiler: &'c Compiler<'a>) -> Self {
        Self { compiler }
    }

    /// Compiles a protocol with all of its methods and events.
    ///
    /// # Errors
    /// Returns `CompileError::UnresolvedReference` if a parameter type cannot be
    /// resolved.
    pub fn compile(&self, decl: &InterfaceDecl) -> Result<Interface> {
        let parsed = decl.name.parse()?;
        let name = self.compiler.declaration_name(&decl.name)?;

        let service_name = decl
            .attributes
            .get("ServiceName")
            .or_else(|| decl.attributes.get("Discoverable"))
            .map(|attr| {
                if attr.value.is_empty() {
                    format!("{}.{}", parsed.library, parsed.name)
                } else {
                    attr.value.clone()
                }
            });

        let methods = decl
            .methods
            .iter()
            .map(|method| self.method(decl, &name, method))
            .collect::<Result<Vec<_>>>()?;

        Ok(Interface {
            service_name,
            proxy_name: format!("{name}Proxy"),
            binding_name: format!("{name}Binding"),
            events_name: format!("{name}Events"),
            has_events: decl.methods.iter().any(IrMethod::is_event),
            methods,
            doc: decl.attributes.doc_lines(),
            name,
        })
    }

    fn method(&self, decl: &InterfaceDecl, interface: &str, method: &IrMethod) -> Result<Method> {
        let context = format!("method '{}' of '{}'", method.name, decl.name);
        let method_class = names::upper_camel(&method.name, NameContext::Declaration);

        let request = self.parameters(&method.request, &context)?;
        let response = self.parameters(&method.response, &context)?;

        let async_response_class = (response.len() > 1)
            .then(|| format!("{interface}${method_class}$Response"));
        let async_response_type = match (&async_response_class, response.as_slice()) {
            (Some(class), _) => class.clone(),
            (None, [single]) => single.ty.async_decl.clone(),
            (None, _) => "void".to_string(),
        };

        let fidl = self.compiler.config().fidl();
        let mut type_expr = String::new();
        type_expr.push_str(&format!("{fidl}.MethodType(\n"));
        type_expr.push_str(&message_expr(fidl, "request", method.has_request, &request));
        type_expr.push_str(&message_expr(fidl, "response", method.has_response, &response));
        type_expr.push_str(&format!("  name: r\"{interface}.{}\",\n", method.name));
        type_expr.push(')');

        Ok(Method {
            ordinal: method.ordinal,
            ordinal_name: format!("_k{interface}_{}_Ordinal", method.name),
            name: names::lower_camel(&method.name, NameContext::Method),
            has_request: method.has_request,
            request,
            has_response: method.has_response,
            response,
            async_response_class,
            async_response_type,
            type_symbol: format!("_k{interface}_{}_Type", method.name),
            type_expr,
            doc: method.attributes.doc_lines(),
        })
    }

    fn parameters(&self, parameters: &[IrParameter], context: &str) -> Result<Vec<Parameter>> {
        let types = TypeResolver::new(self.compiler);
        let fidl = self.compiler.config().fidl();

        parameters
            .iter()
            .map(|param| {
                let ty = types.resolve(&param.ty, NullabilityOverride::AsDeclared, context)?;
                Ok(Parameter {
                    name: names::lower_camel(&param.name, NameContext::Member),
                    offset: param.offset,
                    type_expr: format!(
                        "{fidl}.MemberType<{}>(type: {}, offset: {})",
                        ty.base_decl(),
                        ty.type_expr,
                        param.offset
                    ),
                    ty,
                })
            })
            .collect()
    }
}

/// One `request:`/`response:` argument of a `MethodType`; `null` when absent.
fn message_expr(fidl: &str, label: &str, present: bool, parameters: &[Parameter]) -> String {
    if !present {
        return format!("  {label}: null,\n");
    }
    let entries: Vec<String> = parameters.iter().map(|p| p.type_expr.clone()).collect();
    format!(
        "  {label}: <{fidl}.MemberType>[\n{}  ],\n",
        indent_entries(&entries, "    ")
    )
}
