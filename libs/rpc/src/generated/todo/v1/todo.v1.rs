// @generated
// This file is @generated by prost-build.
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Task {
    #[prost(int64, tag="1")]
    pub id: i64,
    #[prost(string, tag="2")]
    pub title: ::prost::alloc::string::String,
    #[prost(string, tag="3")]
    pub description: ::prost::alloc::string::String,
    #[prost(bool, tag="4")]
    pub completed: bool,
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AddTaskRequest {
    #[prost(message, optional, tag="1")]
    pub task: ::core::option::Option<Task>,
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AddTaskResponse {
    #[prost(message, optional, tag="1")]
    pub task: ::core::option::Option<Task>,
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ListTasksRequest {
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ListTasksResponse {
    #[prost(message, repeated, tag="1")]
    pub tasks: ::prost::alloc::vec::Vec<Task>,
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct CompleteTaskRequest {
    #[prost(int64, tag="1")]
    pub id: i64,
}
#[derive(::serde::Serialize, ::serde::Deserialize)] #[serde(default)]
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct CompleteTaskResponse {
    #[prost(message, optional, tag="1")]
    pub task: ::core::option::Option<Task>,
}
include!("todo.v1.tonic.rs");
// @@protoc_insertion_point(module)
