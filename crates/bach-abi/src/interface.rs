//! Contract interfaces: named functions and events

use bach_crypto::Hasher;

use crate::error::{AbiError, Result};
use crate::event::{Event, EventParam};
use crate::function::{Constructor, Function};
use crate::token::Token;
use crate::types::{Param, ParamType};

/// A contract's callable surface, looked up by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    constructor: Option<Constructor>,
    functions: Vec<Function>,
    events: Vec<Event>,
}

impl Interface {
    /// Create an empty interface
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building an interface
    pub fn builder() -> InterfaceBuilder {
        InterfaceBuilder::default()
    }

    /// Add a function definition
    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// Add an event definition
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the constructor, if declared
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Get a function by name
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Get an event by name
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name == name)
    }

    /// All function definitions
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// All event definitions
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Encode a call to the named function
    pub fn encode_call<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        function_name: &str,
        args: &[Token],
    ) -> Result<Vec<u8>> {
        self.require_function(function_name)?.encode_call(hasher, args)
    }

    /// Decode the named function's return data
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> Result<Vec<Token>> {
        self.require_function(function_name)?.decode_output(data)
    }

    /// Find the function a piece of call data is addressed to
    pub fn function_by_selector<H: Hasher + ?Sized>(
        &self,
        hasher: &H,
        selector: [u8; 4],
    ) -> Option<&Function> {
        self.functions.iter().find(|f| f.selector(hasher) == selector)
    }

    fn require_function(&self, name: &str) -> Result<&Function> {
        self.function(name)
            .ok_or_else(|| AbiError::UnknownItem(format!("function {}", name)))
    }
}

/// Builder for creating contract interfaces
#[derive(Debug, Default)]
pub struct InterfaceBuilder {
    interface: Interface,
}

impl InterfaceBuilder {
    /// Declare the constructor parameters
    pub fn constructor(mut self, inputs: Vec<ParamType>) -> Self {
        self.interface.constructor = Some(Constructor::new(unnamed(inputs)));
        self
    }

    /// Add a function with unnamed parameters
    pub fn function(mut self, name: &str, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        self.interface
            .add_function(Function::new(name, unnamed(inputs), unnamed(outputs)));
        self
    }

    /// Add an event
    pub fn event(mut self, name: &str, inputs: Vec<EventParam>) -> Self {
        self.interface.add_event(Event::new(name, inputs));
        self
    }

    /// Build the interface
    pub fn build(self) -> Interface {
        self.interface
    }
}

fn unnamed(types: Vec<ParamType>) -> Vec<Param> {
    types.into_iter().map(Param::unnamed).collect()
}

/// The ERC-20 token interface
pub fn erc20() -> Interface {
    Interface::builder()
        .function("name", vec![], vec![ParamType::String])
        .function("symbol", vec![], vec![ParamType::String])
        .function("decimals", vec![], vec![ParamType::Uint(8)])
        .function("totalSupply", vec![], vec![ParamType::Uint(256)])
        .function("balanceOf", vec![ParamType::Address], vec![ParamType::Uint(256)])
        .function(
            "transfer",
            vec![ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
        )
        .function(
            "approve",
            vec![ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
        )
        .function(
            "allowance",
            vec![ParamType::Address, ParamType::Address],
            vec![ParamType::Uint(256)],
        )
        .function(
            "transferFrom",
            vec![ParamType::Address, ParamType::Address, ParamType::Uint(256)],
            vec![ParamType::Bool],
        )
        .event(
            "Transfer",
            vec![
                EventParam::indexed("from", ParamType::Address),
                EventParam::indexed("to", ParamType::Address),
                EventParam::new("value", ParamType::Uint(256)),
            ],
        )
        .event(
            "Approval",
            vec![
                EventParam::indexed("owner", ParamType::Address),
                EventParam::indexed("spender", ParamType::Address),
                EventParam::new("value", ParamType::Uint(256)),
            ],
        )
        .build()
}
