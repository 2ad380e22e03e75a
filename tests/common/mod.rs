#![allow(dead_code)]

use linkguard::environment::{ClassDescription, StaticProvider};
use linkguard::jvm::bytecode::opcode;
use linkguard::jvm::class_file::{ClassFileBuilder, FieldAccess, Invoke};
use linkguard::jvm::{BinaryName, ClassAccessFlags, FieldAccessFlags, MethodAccessFlags, Version};
use linkguard::reference::ModuleDefinition;

pub fn class(name: &str) -> BinaryName {
    BinaryName::from_dotted_or_internal(name).unwrap()
}

/// `com/acme/Advice`, calling into `org/lib/Client`
pub fn advice_class() -> Vec<u8> {
    let mut builder = ClassFileBuilder::new(
        class("com.acme.Advice"),
        Some(BinaryName::OBJECT),
        ClassAccessFlags::PUBLIC,
    );
    builder
        .add_method(
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            "onEnter",
            "(Lorg/lib/Client;)V",
            |code| {
                code.line(10)?;
                code.op(opcode::ALOAD_0)?;
                code.invoke(Invoke::Virtual, "org/lib/Client", "send", "()V")?;
                code.line(11)?;
                code.op(opcode::ALOAD_0)?;
                code.field(FieldAccess::GetField, "org/lib/Client", "timeout", "I")?;
                code.op(opcode::POP)?;
                code.line(12)?;
                code.invoke(
                    Invoke::Static,
                    "org/lib/Client",
                    "create",
                    "()Lorg/lib/Client;",
                )?;
                code.op(opcode::POP)?;
                code.invoke(Invoke::Static, "java/lang/System", "nanoTime", "()J")?;
                code.op(0x58)?; // pop2
                code.op(opcode::RETURN)
            },
        )
        .unwrap();
    builder.to_bytes().unwrap()
}

/// `com/acme/TracingListener`, implementing `org/lib/Listener`
pub fn listener_class() -> Vec<u8> {
    let mut builder = ClassFileBuilder::new(
        class("com.acme.TracingListener"),
        Some(BinaryName::OBJECT),
        ClassAccessFlags::PUBLIC,
    );
    builder.add_interface(class("org.lib.Listener"));
    builder
        .add_method(MethodAccessFlags::PUBLIC, "onEvent", "()V", |code| {
            code.line(20)?;
            code.op(opcode::RETURN)
        })
        .unwrap();
    builder.to_bytes().unwrap()
}

pub fn module() -> ModuleDefinition {
    let mut module = ModuleDefinition::new("acme-client");
    module.add_helper(class("com.acme.Advice"), advice_class());
    module.add_helper(class("com.acme.TracingListener"), listener_class());
    module
}

/// Library matching what `module()` was compiled against
pub fn library(runtime_version: Version) -> StaticProvider {
    let mut provider = StaticProvider::new(runtime_version);

    let mut client = ClassDescription::new(class("org.lib.Client"), ClassAccessFlags::PUBLIC);
    client
        .add_method(MethodAccessFlags::PUBLIC, "send", "()V")
        .unwrap();
    client
        .add_method(
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            "create",
            "()Lorg/lib/Client;",
        )
        .unwrap();
    client
        .add_field(FieldAccessFlags::PROTECTED, "timeout", "I")
        .unwrap();
    provider.add_class(client);

    let mut listener = ClassDescription::new(
        class("org.lib.Listener"),
        ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
    );
    listener
        .add_method(
            MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
            "onEvent",
            "()V",
        )
        .unwrap();
    provider.add_class(listener);

    provider
}
