use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, LitStr};

/// Assembles a string literal at compile time and expands to a `[u8; N]`
/// array holding the program. Assembly errors become compile errors pointing
/// at the literal.
///
/// ```ignore
/// let program = asm!("
///     ld v0 0x05
///     ld i sprite
///     drw v0 v0 1
///     sprite: db 0x80
/// ");
/// ```
#[proc_macro]
pub fn asm(input: TokenStream) -> TokenStream {
    let source = parse_macro_input!(input as LitStr);

    expand(&source.value(), source.span()).into()
}

fn expand(source: &str, span: Span) -> TokenStream2 {
    match chip48_core::assemble(source) {
        Ok(bytes) => quote! {
            [#(#bytes),*]
        },
        Err(error) => syn::Error::new(span, error).to_compile_error(),
    }
}
