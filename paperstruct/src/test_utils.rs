use strum::Display;

use crate::source::LOW_CONTENT_SENTINEL;

/// Built-in sample documents, shaped like the text a PDF text recovery step produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum BuiltinSample {
    GraphNeuralNetworks,
    MolecularRepresentations,
    SparseAttention,
    ReferencesOnly,
    FailedExtraction,
    Unstructured,
}

impl BuiltinSample {
    pub const ALL: [BuiltinSample; 6] = [
        BuiltinSample::GraphNeuralNetworks,
        BuiltinSample::MolecularRepresentations,
        BuiltinSample::SparseAttention,
        BuiltinSample::ReferencesOnly,
        BuiltinSample::FailedExtraction,
        BuiltinSample::Unstructured,
    ];

    pub fn text(&self) -> &'static str {
        match self {
            BuiltinSample::GraphNeuralNetworks => GRAPH_NEURAL_NETWORKS,
            BuiltinSample::MolecularRepresentations => MOLECULAR_REPRESENTATIONS,
            BuiltinSample::SparseAttention => SPARSE_ATTENTION,
            BuiltinSample::ReferencesOnly => REFERENCES_ONLY,
            BuiltinSample::FailedExtraction => LOW_CONTENT_SENTINEL,
            BuiltinSample::Unstructured => UNSTRUCTURED,
        }
    }
}

const GRAPH_NEURAL_NETWORKS: &str = "A Study of Graph Neural Networks for Drug Discovery

Jane Doe, John Smith
Department of Computer Science, MIT

Abstract
This paper presents...
1. Introduction
Graph neural networks have become...";

const MOLECULAR_REPRESENTATIONS: &str = "Learning Molecular Representations at Scale

Alice Martin, Bob Chen and Carol White
School of Chemistry, University of Leeds

Abstract
We study molecular representation learning.
Our method scales to millions of compounds.
Keywords: GNN, drug discovery, AI
1. Introduction
Molecules are graphs.
2. Method
We use message passing.
$$ h_v = \\sum_{u} W h_u $$
Figure 1: Message passing overview
Table 2. Dataset statistics
3. Results
Accuracy improves by 4%.
References
[1] Doe, J. (2020). A paper.
Published in Nature.
[2] Smith, J. (2021). Another paper.";

const SPARSE_ATTENTION: &str = "Journal of Machine Learning Research 21 (2020) 1-30
Volume 21, Issue 4
Sparse Attention Mechanisms for Long Documents
Maria Garcia, Tom Lee and Ken Ito
Department of Informatics, Institute of Science Tokyo

Abstract
Long documents challenge attention.
We propose sparse patterns.
Index Terms—attention; sparsity; transformers
I. INTRODUCTION
Transformers are popular for many sequence modelling tasks.
Their cost grows quadratically with the length of the input.
L = \\sum_i \\ell(x_i) + \\lambda R(\\theta) (1)
II. METHOD
Our method is simple and keeps a fixed budget of attended tokens.
Each query attends to a local window and a few global tokens.

Discussion

We discuss results here.

Discussion

A second discussion block.
REFERENCES
(Vaswani et al., 2017) Attention is all you need.
Garcia, M. (2019). Sparse things.
In Proceedings of ACL.";

const REFERENCES_ONLY: &str = "References
[1] Doe, J. (2020). A paper.
Published in Nature.
[2] Smith, J. (2021). Another paper.";

const UNSTRUCTURED: &str = "lorem ipsum dolor sit amet consectetur
adipiscing elit sed do eiusmod tempor
incididunt ut labore et dolore magna aliqua";
