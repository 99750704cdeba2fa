use proc_macro2::Span;
use syn::{bracketed, Ident, LitChar, Result, Token};
use syn::parse::{Parse, ParseStream};

/// One entry of a bracketed class: `'a'` or `'a'..='z'`.
pub enum ClassItem {
    Single(LitChar),
    Range(LitChar, LitChar),
}

impl Parse for ClassItem {
    fn parse(input: ParseStream) -> Result<Self> {
        let first: LitChar = input.parse()?;
        let res = if input.peek(Token![..=]) {
            input.parse::<Token![..=]>()?;
            ClassItem::Range(first, input.parse()?)
        } else {
            ClassItem::Single(first)
        };
        Ok(res)
    }
}

pub enum TermBody {
    Char(LitChar),
    Class(Vec<ClassItem>),
}

pub struct Term {
    pub body: TermBody,
    pub repeated: bool,
    pub span: Span,
}

impl Parse for Term {
    fn parse(input: ParseStream) -> Result<Self> {
        let span = input.span();
        let next = input.lookahead1();
        let body = if next.peek(LitChar) {
            TermBody::Char(input.parse()?)
        } else if next.peek(syn::token::Bracket) {
            let content;
            bracketed!(content in input);
            let mut items = Vec::new();
            while !content.is_empty() {
                items.push(content.parse::<ClassItem>()?);
            }
            TermBody::Class(items)
        } else {
            return Err(next.error());
        };

        let repeated = if input.peek(Token![*]) {
            input.parse::<Token![*]>()?;
            true
        } else {
            false
        };

        Ok(Term { body, repeated, span })
    }
}

pub struct PatternDefinition {
    pub name: Ident,
    pub terms: Vec<Term>,
}

impl Parse for PatternDefinition {
    fn parse(input: ParseStream) -> Result<Self> {
        let name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;

        let mut terms = vec![];
        while !input.peek(Token![;]) {
            terms.push(input.parse::<Term>()?);
        }
        input.parse::<Token![;]>()?;

        Ok(PatternDefinition { name, terms })
    }
}

pub struct Patterns(pub Vec<PatternDefinition>);

impl Parse for Patterns {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut defs = Vec::new();
        while !input.is_empty() {
            defs.push(input.parse::<PatternDefinition>()?);
        }
        Ok(Patterns(defs))
    }
}
