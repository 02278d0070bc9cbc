//! 租赁市场后端服务库
//! 认证、角色授权、所有权检查，以及分类、物品、条款等业务接口

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
