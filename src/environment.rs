use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an environment.  Closures keep their defining scope
/// alive through this handle after the block or call that created it ends.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: its own bindings plus the scope it is nested in.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_shared(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Bind `name` in this scope, replacing any earlier binding of the same name.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up in this scope's own bindings only.
    pub fn get(&self, name: &Token) -> Result<Value> {
        self.values
            .get(&name.lexeme)
            .cloned()
            .ok_or_else(|| undefined(name))
    }

    /// Assign to an existing binding in this scope's own bindings only.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        match self.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(undefined(name)),
        }
    }

    /// Follow the enclosing chain exactly `distance` hops from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current = Rc::clone(env);

        for _ in 0..distance {
            let parent = current.borrow().enclosing.clone()?;
            current = parent;
        }

        Some(current)
    }

    /// Read `name` from the scope `distance` hops above `env`.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Token) -> Result<Value> {
        let scope = Self::ancestor(env, distance).ok_or_else(|| undefined(name))?;
        let value = scope.borrow().get(name);
        value
    }

    /// Assign `name` in the scope `distance` hops above `env`.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) -> Result<()> {
        let scope = Self::ancestor(env, distance).ok_or_else(|| undefined(name))?;
        let result = scope.borrow_mut().assign(name, value);
        result
    }
}

fn undefined(name: &Token) -> LoxError {
    LoxError::runtime(name, format!("Undefined variable '{}'.", name.lexeme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn ancestor_walks_exact_hops() {
        let global = Environment::new().into_shared();
        global.borrow_mut().define("a", Value::Number(1.0));
        let block = Environment::with_enclosing(global.clone()).into_shared();
        let inner = Environment::with_enclosing(block.clone()).into_shared();

        let found = Environment::ancestor(&inner, 2).expect("two hops up");
        assert!(Rc::ptr_eq(&found, &global));
        assert!(Environment::ancestor(&inner, 3).is_none());
    }

    #[test]
    fn get_at_does_not_search_further_out() {
        let global = Environment::new().into_shared();
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(global.clone()).into_shared();

        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")).ok(),
            Some(Value::Number(1.0))
        );
        assert!(Environment::get_at(&inner, 0, &ident("a")).is_err());
    }

    #[test]
    fn assign_requires_existing_binding() {
        let env = Environment::new().into_shared();
        let err = Environment::assign_at(&env, 0, &ident("x"), Value::Nil).unwrap_err();
        assert!(err.to_string().contains("Undefined variable 'x'."));

        env.borrow_mut().define("x", Value::Nil);
        Environment::assign_at(&env, 0, &ident("x"), Value::Bool(true)).unwrap();
        assert_eq!(env.borrow().get(&ident("x")).ok(), Some(Value::Bool(true)));
    }

    #[test]
    fn shadowing_across_scopes() {
        let outer = Environment::new().into_shared();
        outer.borrow_mut().define("a", Value::String("outer".into()));
        let inner = Environment::with_enclosing(outer.clone()).into_shared();
        inner.borrow_mut().define("a", Value::String("inner".into()));

        assert_eq!(
            Environment::get_at(&inner, 0, &ident("a")).ok(),
            Some(Value::String("inner".into()))
        );
        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")).ok(),
            Some(Value::String("outer".into()))
        );
    }
}
