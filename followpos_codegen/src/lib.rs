extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{quote, quote_spanned};
use syn::{Ident, parse_macro_input};

use followpos_core::automaton::{Dfa, DfaTable};
use followpos_core::syntax::{CharClass, Node, TreeBuilder};

use crate::parse::{ClassItem, PatternDefinition, Patterns, Term, TermBody};

mod parse;

type GenResult<T> = std::result::Result<T, (Span, String)>;

fn to_snake_case(name: &str) -> String {
    let mut res = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if index != 0 {
                res.push('_');
            }
            res.push(ch.to_ascii_lowercase());
        } else {
            res.push(ch);
        }
    }
    res
}

fn term_class(term: &Term) -> GenResult<CharClass> {
    let class = match &term.body {
        TermBody::Char(ch) => CharClass::new().with_chars(&ch.value().to_string()),
        TermBody::Class(items) => items.iter().try_fold(CharClass::new(), |class, item| {
            match item {
                ClassItem::Single(ch) => class.with_chars(&ch.value().to_string()),
                ClassItem::Range(from, to) => class.with_range(from.value(), to.value()),
            }
        }),
    };
    class.map_err(|e| (term.span, e.to_string()))
}

/// Concatenates the terms and closes the pattern with the end marker.
fn build_tree(def: &PatternDefinition) -> GenResult<Node> {
    let mut builder = TreeBuilder::new();
    let mut body: Option<Node> = None;

    for term in def.terms.iter() {
        let class = term_class(term)?;
        let node = builder.class(&class).map_err(|e| (term.span, e.to_string()))?;
        let node = if term.repeated { Node::star(node) } else { node };
        body = Some(match body {
            None => node,
            Some(prev) => Node::concat(prev, node),
        });
    }

    let body = body.ok_or_else(|| (def.name.span(), format!("Pattern {} has no terms", def.name)))?;
    Ok(Node::concat(body, builder.end_marker()))
}

fn build_table(def: &PatternDefinition) -> GenResult<DfaTable> {
    let tree = build_tree(def)?;
    let dfa = Dfa::from_tree(&tree).map_err(|e| (def.name.span(), e.to_string()))?;
    let min = dfa.minimize().map_err(|e| (def.name.span(), e.to_string()))?;
    Ok(DfaTable::from_automaton(&min))
}

fn generate_pattern_code(def: &PatternDefinition) -> proc_macro2::TokenStream {
    let module = Ident::new(&to_snake_case(&def.name.to_string()), def.name.span());

    let build_code = match build_table(def) {
        Ok(table) => {
            let raw_code = table.to_raw_code();
            quote! {
                followpos_core::automaton::DfaTable::from_raw(#raw_code)
                    .expect("generated tables are always consistent")
            }
        },
        Err((span, descr)) => {
            quote_spanned! {
                span =>
                compile_error!(#descr);
                unimplemented!()
            }
        },
    };

    quote! {
        pub mod #module {
            lazy_static::lazy_static! {
                static ref TABLE: followpos_core::automaton::DfaTable = build_dfa();
            }

            pub fn build_dfa() -> followpos_core::automaton::DfaTable {
                #build_code
            }

            pub fn matches(input: &str) -> bool {
                TABLE.matches(input)
            }
        }
    }
}

/// Compiles every `Name = term term* ... ;` pattern into a module exposing its minimal DFA.
/// A term is a char literal or a bracketed class of char literals and `'a'..='z'` ranges, either
/// one optionally followed by `*`.
#[proc_macro]
pub fn direct_dfa(item: TokenStream) -> TokenStream {
    let ast: Patterns = parse_macro_input!(item as Patterns);

    let codes = ast.0.iter().map(generate_pattern_code);

    quote!(
        #(#codes)*
    ).into()
}
